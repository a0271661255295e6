//! Import recognizer, plus the used-as-tag derivation that feeds the
//! declaration hierarchy.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::{ImportFact, ImportKind};

static NAMED_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+\{([^}]+)\}\s+from\s+['"]([^'"]+)['"]"#).expect("named import pattern")
});

static DEFAULT_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+(\w+)\s+from\s+['"]([^'"]+)['"]"#).expect("default import pattern")
});

static SIDE_EFFECT_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s+['"]([^'"]+)['"]"#).expect("side-effect import pattern"));

pub fn recognize(content: &str, file_path: &str) -> Vec<ImportFact> {
    let mut imports = Vec::new();

    for caps in NAMED_IMPORT.captures_iter(content) {
        let source = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        for name in caps
            .get(1)
            .map(|m| m.as_str())
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            imports.push(ImportFact {
                kind: ImportKind::Named,
                name: Some(name.to_string()),
                source: source.to_string(),
                file_path: file_path.to_string(),
            });
        }
    }

    for caps in DEFAULT_IMPORT.captures_iter(content) {
        imports.push(ImportFact {
            kind: ImportKind::Default,
            name: caps.get(1).map(|m| m.as_str().to_string()),
            source: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            file_path: file_path.to_string(),
        });
    }

    // The bare form only matches when a quote follows `import` directly, so
    // bound imports never double-count here.
    for caps in SIDE_EFFECT_IMPORT.captures_iter(content) {
        imports.push(ImportFact {
            kind: ImportKind::SideEffect,
            name: None,
            source: caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
            file_path: file_path.to_string(),
        });
    }

    imports
}

/// Imported names that appear as a markup tag in the same file. These edges
/// feed hierarchy derivation: a declaration in this file declares-child each
/// used tag.
pub fn used_tags(content: &str, imports: &[ImportFact]) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    for import in imports {
        let Some(name) = &import.name else { continue };
        if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
            continue;
        }
        let Ok(usage) = Regex::new(&format!(r"<\s*{}\s*[^>]*>", regex::escape(name))) else {
            continue;
        };
        if usage.is_match(content) {
            tags.insert(name.clone());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
import React from 'react';
import { View, Text } from 'react-native';
import './polyfills';

export const Row = () => <View><Text>hi</Text></View>;
"#;

    #[test]
    fn recognizes_all_three_import_forms() {
        let imports = recognize(SAMPLE, "src/Row.tsx");
        assert!(imports.iter().any(|i| {
            i.kind == ImportKind::Default && i.name.as_deref() == Some("React")
        }));
        assert!(imports.iter().any(|i| {
            i.kind == ImportKind::Named
                && i.name.as_deref() == Some("View")
                && i.source == "react-native"
        }));
        assert!(imports.iter().any(|i| {
            i.kind == ImportKind::SideEffect && i.source == "./polyfills" && i.name.is_none()
        }));
    }

    #[test]
    fn side_effect_form_does_not_double_count_bound_imports() {
        let imports = recognize(SAMPLE, "src/Row.tsx");
        let side_effects: Vec<&ImportFact> = imports
            .iter()
            .filter(|i| i.kind == ImportKind::SideEffect)
            .collect();
        assert_eq!(side_effects.len(), 1);
    }

    #[test]
    fn used_tags_requires_markup_usage() {
        let imports = recognize(SAMPLE, "src/Row.tsx");
        let tags = used_tags(SAMPLE, &imports);
        assert!(tags.contains("View"));
        assert!(tags.contains("Text"));
        assert!(!tags.contains("React"), "React is never used as a tag");
    }
}
