// Snippet locator: bounded context windows, enclosing-declaration lookup,
// and balanced-brace body extraction.
//
// Pure functions over raw text. Every recognizer leans on these instead of
// re-implementing position math.

use once_cell::sync::Lazy;
use regex::Regex;

static ENCLOSING_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:async\s+)?(?:function\s+(\w+)|const\s+(\w+)\s*=\s*(?:async\s+)?\([^)]*\)\s*=>)")
        .expect("enclosing declaration pattern")
});

static ENCLOSING_RETURN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:function\s+\w+|const\s+\w+\s*=\s*(?:async\s+)?\([^)]*\))\s*:\s*([^{]+)")
        .expect("enclosing return-type pattern")
});

/// Clamp `index` down to the nearest UTF-8 character boundary.
fn floor_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// A bounded window of text around `position`, flattened to one line.
pub fn context_snippet(content: &str, position: usize, length: usize) -> String {
    let start = floor_boundary(content, position.saturating_sub(length / 2));
    let end = floor_boundary(content, (position + length / 2).min(content.len()));
    content[start..end].replace('\n', " ").trim().to_string()
}

/// Name of the nearest declaration preceding `position`, scanning backward
/// for the last matching function/arrow-const signature. Best-effort: `None`
/// when nothing precedes the position.
pub fn enclosing_declaration(content: &str, position: usize) -> Option<String> {
    let prefix = &content[..floor_boundary(content, position)];
    let last = ENCLOSING_DECL.captures_iter(prefix).last()?;
    last.get(1)
        .or_else(|| last.get(2))
        .map(|m| m.as_str().to_string())
}

/// Declared return type of the nearest annotated declaration preceding
/// `position`, if any.
pub fn enclosing_return_type(content: &str, position: usize) -> Option<String> {
    let prefix = &content[..floor_boundary(content, position)];
    let last = ENCLOSING_RETURN.captures_iter(prefix).last()?;
    last.get(1)
        .map(|m| m.as_str().trim().trim_end_matches("=>").trim().to_string())
}

/// Extract a scoped body by balanced-brace counting from the first `{` at or
/// after `start`.
///
/// Increments on every `{`, decrements on every `}`, stops at depth zero.
/// Unbalanced input degrades to the text through end-of-file; no opening
/// brace at all yields an empty slice.
pub fn balanced_body(content: &str, start: usize) -> &str {
    let start = floor_boundary(content, start);
    let open = match content[start..].find('{') {
        Some(offset) => start + offset,
        None => return "",
    };

    let mut depth = 0usize;
    for (i, b) in content.as_bytes().iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return &content[open..=i];
                }
            }
            _ => {}
        }
    }
    &content[open..]
}

/// 1-based line number of a byte offset.
pub fn line_of(content: &str, offset: usize) -> u32 {
    let offset = offset.min(content.len());
    content.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_snippet_is_bounded_and_single_line() {
        let text = "line one\nline two with a target here\nline three";
        let pos = text.find("target").unwrap();
        let snippet = context_snippet(text, pos, 20);
        assert!(snippet.contains("target") || snippet.contains("with"));
        assert!(!snippet.contains('\n'), "snippet must be flattened");
        assert!(snippet.len() <= 20 + 4);
    }

    #[test]
    fn context_snippet_survives_multibyte_boundaries() {
        let text = "préfixe ✓ suffixe";
        // Positions landing mid-codepoint must not panic.
        for pos in 0..text.len() {
            let _ = context_snippet(text, pos, 7);
        }
    }

    #[test]
    fn enclosing_declaration_finds_last_preceding() {
        let text = "function first() {}\nconst second = async () => {\n  fetch('/x')\n}";
        let pos = text.find("fetch").unwrap();
        assert_eq!(enclosing_declaration(text, pos).as_deref(), Some("second"));
        assert_eq!(enclosing_declaration(text, 0), None);
    }

    #[test]
    fn enclosing_return_type_trims_annotation() {
        let text = "const load = (id: string): Promise<User> => {\n  return api.get('/u')\n}";
        let pos = text.find("api.get").unwrap();
        assert_eq!(
            enclosing_return_type(text, pos).as_deref(),
            Some("Promise<User>")
        );
    }

    #[test]
    fn balanced_body_tracks_nesting() {
        let text = "fn x { a { b } c } trailing";
        assert_eq!(balanced_body(text, 0), "{ a { b } c }");
    }

    #[test]
    fn balanced_body_degrades_on_unbalanced_input() {
        let text = "broken { never closes";
        assert_eq!(balanced_body(text, 0), "{ never closes");
        assert_eq!(balanced_body("no braces at all", 0), "");
    }

    #[test]
    fn line_of_counts_from_one() {
        let text = "a\nb\nc";
        assert_eq!(line_of(text, 0), 1);
        assert_eq!(line_of(text, 2), 2);
        assert_eq!(line_of(text, 4), 3);
    }
}
