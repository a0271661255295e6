//! Optional flagged-issue passes over a declaration's file.
//!
//! Each heuristic returns zero or more human-readable issue strings. They
//! are advisory and intentionally coarse: a match means "worth a look", not
//! a confirmed defect.

use once_cell::sync::Lazy;
use regex::Regex;

static EFFECT_WITHOUT_DEPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"useEffect\(\s*\(\)\s*=>\s*\{[^}]+\}\s*\)").expect("effect-without-deps pattern")
});

static INLINE_JSX_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\w+\s+\w+=\{(?:\(\)\s*=>|function\s*\([^)]*\)\s*\{)[^}]+\}")
        .expect("inline jsx function pattern")
});

static INLINE_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"style=\{\{\s*[^}]+\}\}").expect("inline style pattern"));

/// Performance heuristics for one declaration.
pub fn performance_issues(content: &str, name: &str) -> Vec<String> {
    let mut issues = Vec::new();

    if EFFECT_WITHOUT_DEPS.is_match(content) {
        issues.push(format!(
            "Component '{name}' has useEffect without dependency array"
        ));
    }

    let inline_count = INLINE_JSX_FUNCTION.find_iter(content).count();
    if inline_count > 0 {
        issues.push(format!(
            "Component '{name}' has {inline_count} inline functions in JSX"
        ));
    }

    if needs_memoization(content, name) {
        issues.push(format!("Component '{name}' could benefit from memoization"));
    }

    issues
}

/// A props-taking declaration with no memo wrapper anywhere in the file.
fn needs_memoization(content: &str, name: &str) -> bool {
    let escaped = regex::escape(name);
    let wrapped = Regex::new(&format!(r"(?:React\.)?memo\(\s*{escaped}"));
    let takes_props = Regex::new(&format!(r"const\s+{escaped}\s*=\s*\(\s*\{{\s*[^}}]+\}}\s*\)"));
    match (wrapped, takes_props) {
        (Ok(wrapped), Ok(takes_props)) => {
            !wrapped.is_match(content) && takes_props.is_match(content)
        }
        _ => false,
    }
}

/// Platform-specific heuristics for one declaration.
pub fn platform_issues(content: &str, name: &str) -> Vec<String> {
    let mut issues = Vec::new();

    let inline_count = INLINE_STYLE.find_iter(content).count();
    if inline_count > 0 {
        issues.push(format!(
            "Component '{name}' has {inline_count} inline styles that should use StyleSheet"
        ));
    }

    if !content.contains("Platform.OS")
        && (content.contains("SafeAreaView") || content.contains("StatusBar"))
    {
        issues.push(format!(
            "Component '{name}' might need platform-specific handling"
        ));
    }

    if content.contains("Image") && content.contains("source") && !content.contains("resizeMode") {
        issues.push(format!(
            "Component '{name}' has Image without resizeMode specified"
        ));
    }

    if content.contains("useEffect")
        && content.contains("navigation")
        && (content.contains("addEventListener") || content.contains("addListener"))
        && !content.contains("return")
    {
        issues.push(format!(
            "Component '{name}' might have memory leaks from navigation event listeners"
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_without_dependency_array_is_flagged() {
        let content = "useEffect(() => { refresh() })";
        let issues = performance_issues(content, "Feed");
        assert!(issues
            .iter()
            .any(|i| i.contains("useEffect without dependency array")));
    }

    #[test]
    fn effect_with_dependency_array_is_not_flagged() {
        let content = "useEffect(() => { refresh() }, [id])";
        let issues = performance_issues(content, "Feed");
        assert!(!issues
            .iter()
            .any(|i| i.contains("useEffect without dependency array")));
    }

    #[test]
    fn memoization_hint_requires_props_and_no_wrapper() {
        let unwrapped = "const Card = ({ title }) => <Text>{title}</Text>;";
        assert!(performance_issues(unwrapped, "Card")
            .iter()
            .any(|i| i.contains("memoization")));

        let wrapped = "const Card = ({ title }) => <Text>{title}</Text>;\nexport default React.memo(Card);";
        assert!(!performance_issues(wrapped, "Card")
            .iter()
            .any(|i| i.contains("memoization")));
    }

    #[test]
    fn inline_styles_counted_in_message() {
        let content = r#"<View style={{ margin: 2 }}><Text style={{ color: 'red' }} /></View>"#;
        let issues = platform_issues(content, "Panel");
        assert!(issues.iter().any(|i| i.contains("2 inline styles")));
    }
}
