//! Security-concern recognizer.
//!
//! A fixed catalogue of concern shapes; every match is surfaced with a
//! bounded context snippet so the report stays reviewable without opening
//! the file.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::text;
use crate::extractors::base::SecurityConcern;

static CONCERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        (
            "Hardcoded secrets",
            r#"(?:apiKey|secretKey|password|token)\s*=\s*['"][^'"]+['"]"#,
        ),
        (
            "Insecure storage",
            r#"localStorage\.setItem\(['"](?:token|auth|password)['"]"#,
        ),
        ("SQL injection risk", r#"executeQuery\(['"]SELECT.+\$\{"#),
        ("XSS risk", r"(?:innerHTML|dangerouslySetInnerHTML)\s*="),
        (
            "Potential CSRF",
            r#"fetch\(.+\{credentials:\s*['"]include['"]"#,
        ),
    ]
    .iter()
    .map(|(label, p)| (*label, Regex::new(p).expect("security concern pattern")))
    .collect()
});

pub fn recognize(content: &str, file_path: &str) -> Vec<SecurityConcern> {
    let mut concerns = Vec::new();
    for (issue, pattern) in CONCERNS.iter() {
        for m in pattern.find_iter(content) {
            concerns.push(SecurityConcern {
                issue: issue.to_string(),
                context: text::context_snippet(content, m.start(), 100),
                file_path: file_path.to_string(),
            });
        }
    }
    concerns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_hardcoded_secret_with_context() {
        let content = "const apiKey = 'sk-12345';\nexport default apiKey;";
        let concerns = recognize(content, "src/config.ts");
        assert_eq!(concerns.len(), 1);
        assert_eq!(concerns[0].issue, "Hardcoded secrets");
        assert!(concerns[0].context.contains("apiKey"));
    }

    #[test]
    fn flags_insecure_token_storage() {
        let content = "localStorage.setItem('token', session.token);";
        let concerns = recognize(content, "src/auth.ts");
        assert!(concerns.iter().any(|c| c.issue == "Insecure storage"));
    }

    #[test]
    fn clean_file_produces_no_concerns() {
        let concerns = recognize("const greeting = 'hello';", "src/hello.ts");
        assert!(concerns.is_empty());
    }
}
