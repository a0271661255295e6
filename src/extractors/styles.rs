//! Styling recognizer: stylesheet definitions and inline style occurrences.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::text;
use crate::extractors::base::StyleFact;

static STYLESHEET_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:const|let|var)\s+(\w+)\s*=\s*StyleSheet\.create\(")
        .expect("stylesheet pattern")
});

static STYLE_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+):\s*\{").expect("style rule pattern"));

static INLINE_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"style=\{\{\s*[^}]+\}\}").expect("inline style pattern"));

pub fn stylesheets(content: &str, file_path: &str) -> Vec<StyleFact> {
    STYLESHEET_DECL
        .captures_iter(content)
        .map(|caps| {
            let start = caps.get(0).map(|m| m.end()).unwrap_or(0);
            // The argument object is brace-balanced so nested rule bodies do
            // not cut the definition short.
            let body = text::balanced_body(content, start);
            StyleFact {
                name: caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
                rule_count: STYLE_RULE.find_iter(body).count(),
                file_path: file_path.to_string(),
            }
        })
        .collect()
}

/// Number of inline style literals in the file.
pub fn inline_style_count(content: &str) -> usize {
    INLINE_STYLE.find_iter(content).count()
}
