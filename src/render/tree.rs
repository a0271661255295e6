//! Machine-readable tree encoding.
//!
//! Serializes every retained bundle plus the derived cross-file views into
//! one JSON document. Map keys are stringified so the document stays plain
//! JSON.

use serde_json::json;

use crate::index::ProjectIndex;
use crate::runner::RunStats;

pub fn render(index: &ProjectIndex, stats: &RunStats) -> String {
    let endpoints_by_method: serde_json::Map<String, serde_json::Value> = index
        .endpoints_by_method()
        .into_iter()
        .map(|(method, endpoints)| (method.to_string(), json!(endpoints)))
        .collect();

    let alias_categories: serde_json::Map<String, serde_json::Value> = index
        .alias_category_tallies()
        .into_iter()
        .map(|(category, count)| (category.to_string(), json!(count)))
        .collect();

    let doc = json!({
        "run": stats,
        "files": index.bundles(),
        "hierarchy": index.build_hierarchy(),
        "complex_components": index.complex_components(),
        "issues": index.issues(),
        "hook_usages": index.hook_usages(),
        "api_usages": index.api_usages(),
        "endpoints_by_method": endpoints_by_method,
        "module_dependencies": index.modules_by_import_count(),
        "type_alias_categories": alias_categories,
        "totals": {
            "files": index.bundles().len(),
            "components": index.components().count(),
            "hooks": index.hooks().count(),
            "services": index.services().count(),
            "interfaces": index.interfaces().count(),
            "type_aliases": index.type_aliases().count(),
            "routes": index.routes().count(),
            "transitions": index.transitions().count(),
            "state_patterns": index.state_patterns().count(),
            "tables": index.tables().count(),
            "endpoints": index.endpoints().count(),
            "call_sites": index.call_sites().count(),
            "security_concerns": index.security_concerns().count(),
            "style_rules": index.total_style_rules(),
            "reportable_lines": index.total_lines(),
        },
    });

    // The document is built from plain values; serialization cannot fail.
    serde_json::to_string_pretty(&doc).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractConfig;
    use crate::extractors::manager::aggregate_content;

    #[test]
    fn document_parses_and_carries_totals() {
        let mut index = ProjectIndex::new();
        let content = r#"
import { View } from 'react-native';

export const Panel = () => {
  return (<View />);
};
"#;
        let config = ExtractConfig::default();
        index.merge(aggregate_content(content, "src/Panel.tsx", &config).unwrap());

        let stats = RunStats {
            processed: 1,
            errored: 1,
            ..RunStats::default()
        };
        let parsed: serde_json::Value = serde_json::from_str(&render(&index, &stats)).unwrap();
        assert_eq!(parsed["totals"]["files"], 1);
        assert_eq!(parsed["totals"]["components"], 1);
        assert_eq!(parsed["files"][0]["rel_path"], "src/Panel.tsx");
        assert_eq!(parsed["run"]["processed"], 1);
        assert_eq!(parsed["run"]["errored"], 1);
    }

    #[test]
    fn empty_index_is_still_valid_json() {
        let parsed: serde_json::Value =
            serde_json::from_str(&render(&ProjectIndex::new(), &RunStats::default())).unwrap();
        assert_eq!(parsed["totals"]["files"], 0);
        assert!(parsed["files"].as_array().unwrap().is_empty());
    }
}
