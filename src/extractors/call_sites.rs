//! Call-site recognizer.
//!
//! Categorization is pattern-family based: each category carries a fixed
//! ordered list of textual shapes, every occurrence is reported once per
//! family it matches, and families are never deduplicated against each
//! other.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::text;
use crate::extractors::base::{CallCategory, CallSiteFact};

static NETWORK_FAMILIES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[a-zA-Z0-9_]+\.(?:get|post|put|delete|patch)\(",
        r"fetch\(",
        r"axios\.(?:get|post|put|delete|patch)\(",
        r"api\.[a-zA-Z0-9_]+\(",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("network family pattern"))
    .collect()
});

static STATE_UPDATE_FAMILIES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"this\.setState\(", r"\bset[A-Z]\w*\("]
        .iter()
        .map(|p| Regex::new(p).expect("state update family pattern"))
        .collect()
});

static NAVIGATION_FAMILIES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?:router|navigation)\.(?:push|navigate)\("]
        .iter()
        .map(|p| Regex::new(p).expect("navigation family pattern"))
        .collect()
});

pub fn recognize(content: &str, file_path: &str) -> Vec<CallSiteFact> {
    let mut sites = Vec::new();
    collect(content, file_path, CallCategory::Network, &NETWORK_FAMILIES, &mut sites);
    collect(
        content,
        file_path,
        CallCategory::StateUpdate,
        &STATE_UPDATE_FAMILIES,
        &mut sites,
    );
    collect(
        content,
        file_path,
        CallCategory::Navigation,
        &NAVIGATION_FAMILIES,
        &mut sites,
    );
    sites
}

fn collect(
    content: &str,
    file_path: &str,
    category: CallCategory,
    families: &[Regex],
    sites: &mut Vec<CallSiteFact>,
) {
    for family in families {
        for m in family.find_iter(content) {
            sites.push(CallSiteFact {
                category,
                text: m.as_str().to_string(),
                enclosing: text::enclosing_declaration(content, m.start()),
                file_path: file_path.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
const loadItems = async () => {
  const data = await api.fetchItems();
  setItems(data);
  navigation.navigate('Detail');
};
"#;

    #[test]
    fn categorizes_by_family() {
        let sites = recognize(SAMPLE, "src/screens/Items.tsx");
        assert!(sites
            .iter()
            .any(|s| s.category == CallCategory::Network && s.text == "api.fetchItems("));
        assert!(sites
            .iter()
            .any(|s| s.category == CallCategory::StateUpdate && s.text == "setItems("));
        assert!(sites
            .iter()
            .any(|s| s.category == CallCategory::Navigation
                && s.text == "navigation.navigate("));
    }

    #[test]
    fn enclosing_declaration_is_best_effort() {
        let sites = recognize(SAMPLE, "src/screens/Items.tsx");
        for site in &sites {
            assert_eq!(site.enclosing.as_deref(), Some("loadItems"));
        }

        let orphan = recognize("setFlag(true)", "src/init.ts");
        assert_eq!(orphan.len(), 1);
        assert_eq!(orphan[0].enclosing, None);
    }

    #[test]
    fn occurrence_reported_once_per_matching_family() {
        let sites = recognize("axios.get('/x')", "src/api.ts");
        // Matches the receiver-method family and the axios family.
        let network: Vec<&CallSiteFact> = sites
            .iter()
            .filter(|s| s.category == CallCategory::Network)
            .collect();
        assert_eq!(network.len(), 2);
    }
}
