//! Plain structured-text encoding.

use crate::index::ProjectIndex;
use crate::render::{base_name, truncated};
use crate::runner::RunStats;

pub fn render(index: &ProjectIndex, stats: &RunStats) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("=== CODE CONTEXT ===".to_string());
    lines.push(format!("Total files processed: {}", stats.processed));
    if stats.excluded > 0 {
        lines.push(format!("Files with nothing to report: {}", stats.excluded));
    }
    if stats.skipped > 0 {
        lines.push(format!("Files skipped: {}", stats.skipped));
    }
    if stats.errored > 0 {
        lines.push(format!("Files with read errors: {}", stats.errored));
    }
    lines.push(String::new());

    let complex = index.top_by_complexity(20);
    if !complex.is_empty() {
        lines.push("=== COMPONENT COMPLEXITY ===".to_string());
        lines.push("(Components with complexity > 10, sorted by complexity)".to_string());
        lines.push("Component Name | Complexity | File".to_string());
        lines.push("--------------|------------|-----".to_string());
        for entry in &complex {
            lines.push(format!(
                "{} | {} | {}",
                entry.name,
                entry.complexity,
                base_name(&entry.file_path)
            ));
        }
        let total = index.complex_components().len();
        if total > 20 {
            lines.push(format!("... and {} more components", total - 20));
        }
        lines.push(String::new());
        lines.push("Complexity Guidelines:".to_string());
        lines.push("- 0-5: Simple component".to_string());
        lines.push("- 6-10: Moderate complexity".to_string());
        lines.push("- 11-20: Complex component".to_string());
        lines.push("- 21+: Very complex, consider refactoring".to_string());
        lines.push(String::new());
    }

    let hooks: Vec<_> = index.hooks().collect();
    if !hooks.is_empty() {
        lines.push("=== CUSTOM HOOKS ===".to_string());
        for hook in &hooks {
            lines.push(format!(
                "Hook: {} (from {})",
                hook.name,
                base_name(&hook.file_path)
            ));
            if !hook.params.is_empty() {
                lines.push("  Parameters:".to_string());
                for param in &hook.params {
                    lines.push(format!("    - {}: {}", param.name, param.ty));
                }
            }
            if !hook.returns.is_empty() {
                lines.push("  Returns:".to_string());
                for ret in &hook.returns {
                    lines.push(format!("    - {ret}"));
                }
            }
            if !hook.states.is_empty() {
                lines.push(format!("  State Variables: {}", hook.states.len()));
                let (visible, rest) = truncated(&hook.states, 3);
                for state in visible {
                    let initial = if state.initial_value.is_empty() {
                        String::new()
                    } else {
                        format!(" = {}", state.initial_value)
                    };
                    lines.push(format!("    - {}{initial}", state.name));
                }
                if rest > 0 {
                    lines.push(format!("    ... and {rest} more state variables"));
                }
            }
            if !hook.effects.is_empty() {
                lines.push(format!("  Effects: {}", hook.effects.len()));
                let (visible, rest) = truncated(&hook.effects, 2);
                for effect in visible {
                    lines.push(format!(
                        "    - Dependencies: [{}]",
                        effect.dependencies.join(", ")
                    ));
                }
                if rest > 0 {
                    lines.push(format!("    ... and {rest} more effects"));
                }
            }
            if hook.callbacks > 0 {
                lines.push(format!("  Callbacks: {}", hook.callbacks));
            }
            if hook.memos > 0 {
                lines.push(format!("  Memoized Values: {}", hook.memos));
            }
            lines.push(String::new());
        }
    }

    let services: Vec<_> = index.services().collect();
    if !services.is_empty() {
        lines.push("=== SERVICES ===".to_string());
        for service in &services {
            let singleton = if service.singleton { " (Singleton)" } else { "" };
            let parent = service
                .parent_class
                .as_ref()
                .map(|p| format!(" extends {p}"))
                .unwrap_or_default();
            lines.push(format!(
                "Service: {}{singleton}{parent} (from {})",
                service.name,
                base_name(&service.file_path)
            ));
            if !service.methods.is_empty() {
                lines.push("  Methods:".to_string());
                for method in &service.methods {
                    let params = method
                        .params
                        .iter()
                        .map(|p| format!("{}: {}", p.name, p.ty))
                        .collect::<Vec<_>>()
                        .join(", ");
                    let ret = method
                        .return_type
                        .as_ref()
                        .map(|r| format!(" -> {r}"))
                        .unwrap_or_default();
                    lines.push(format!("    - {}({params}){ret}", method.name));
                }
            }
            if !service.endpoints.is_empty() {
                lines.push("  API Endpoints:".to_string());
                for endpoint in &service.endpoints {
                    lines.push(format!("    - {endpoint}"));
                }
            }
            lines.push(String::new());
        }
    }

    let routes: Vec<_> = index.routes().collect();
    if !routes.is_empty() {
        lines.push("=== NAVIGATION ROUTES ===".to_string());
        for route in &routes {
            let component = route
                .component
                .as_ref()
                .map(|c| format!(" -> {c}"))
                .unwrap_or_default();
            lines.push(format!("Route: {}{component}", route.name));
            lines.push(format!("  File: {}", base_name(&route.file_path)));
            lines.push(String::new());
        }
    }

    let state_patterns: Vec<_> = index.state_patterns().collect();
    if !state_patterns.is_empty() {
        lines.push("=== STATE MANAGEMENT ===".to_string());
        let mut kinds: Vec<_> = state_patterns.iter().map(|p| p.kind).collect();
        kinds.sort();
        kinds.dedup();
        for kind in kinds {
            lines.push(format!("{kind}:"));
            for pattern in state_patterns.iter().filter(|p| p.kind == kind) {
                lines.push(format!(
                    "  - {} (from {})",
                    pattern.name,
                    base_name(&pattern.file_path)
                ));
            }
            lines.push(String::new());
        }
    }

    let tables: Vec<_> = index.tables().collect();
    if !tables.is_empty() {
        lines.push("=== DATABASE SCHEMAS ===".to_string());
        for table in &tables {
            lines.push(format!(
                "Table: {} (from {})",
                table.table,
                base_name(&table.file_path)
            ));
            lines.push("  Columns:".to_string());
            for column in &table.columns {
                let nullable = if column.nullable { "NULL" } else { "NOT NULL" };
                let default = column
                    .default
                    .as_ref()
                    .map(|d| format!(" DEFAULT {d}"))
                    .unwrap_or_default();
                let pk = if table.primary_keys.contains(&column.name) {
                    " PRIMARY KEY"
                } else {
                    ""
                };
                lines.push(format!(
                    "    - {}: {} {nullable}{default}{pk}",
                    column.name, column.ty
                ));
            }
            if !table.primary_keys.is_empty() {
                lines.push("  Primary Keys:".to_string());
                for pk in &table.primary_keys {
                    lines.push(format!("    - {pk}"));
                }
            }
            if !table.foreign_keys.is_empty() {
                lines.push("  Foreign Keys:".to_string());
                for fk in &table.foreign_keys {
                    lines.push(format!(
                        "    - {} -> {}.{}",
                        fk.column, fk.ref_table, fk.ref_column
                    ));
                }
            }
            if !table.indices.is_empty() {
                lines.push("  Indices:".to_string());
                for idx in &table.indices {
                    let unique = if idx.unique { "UNIQUE " } else { "" };
                    lines.push(format!(
                        "    - {unique}INDEX {} ({})",
                        idx.name,
                        idx.columns.join(", ")
                    ));
                }
            }
            lines.push(String::new());
        }
    }

    let modules = index.modules_by_import_count();
    if !modules.is_empty() {
        lines.push("=== MODULE DEPENDENCIES ===".to_string());
        let (visible, rest) = truncated(&modules, 20);
        for module in visible {
            let mut kinds = Vec::new();
            if module.named > 0 {
                kinds.push(format!("{} named", module.named));
            }
            if module.default > 0 {
                kinds.push(format!("{} default", module.default));
            }
            if module.side_effect > 0 {
                kinds.push(format!("{} side-effect", module.side_effect));
            }
            lines.push(format!(
                "Module: {} - {} imports ({})",
                module.source,
                module.total(),
                kinds.join(", ")
            ));
        }
        if rest > 0 {
            lines.push(format!("... and {rest} more modules"));
        }
        lines.push(String::new());
    }

    let interface_count = index.interfaces().count();
    let alias_count = index.type_aliases().count();
    if interface_count > 0 || alias_count > 0 {
        lines.push("=== TYPE SYSTEM ANALYSIS ===".to_string());
        lines.push(format!("Total Interfaces: {interface_count}"));
        lines.push(format!("Total Type Aliases: {alias_count}"));
        lines.push(String::new());
        if interface_count > 0 {
            lines.push("Most Complex Interfaces:".to_string());
            for interface in index.top_interfaces(5) {
                let parents = if interface.parents.is_empty() {
                    String::new()
                } else {
                    format!(" extends {}", interface.parents.join(", "))
                };
                lines.push(format!(
                    "- {}{parents} - {} properties",
                    interface.name,
                    interface.properties.len()
                ));
            }
            if interface_count > 5 {
                lines.push(format!("... and {} more interfaces", interface_count - 5));
            }
            lines.push(String::new());
        }
        if alias_count > 0 {
            lines.push("Type Alias Categories:".to_string());
            for (category, count) in index.alias_category_tallies() {
                lines.push(format!("- {category}: {count}"));
            }
            lines.push(String::new());
        }
    }

    let by_method = index.endpoints_by_method();
    if !by_method.is_empty() {
        lines.push("=== API ENDPOINTS ===".to_string());
        for (method, endpoints) in &by_method {
            lines.push(format!("{method} Endpoints ({}):", endpoints.len()));
            let (visible, rest) = truncated(endpoints, 10);
            for endpoint in visible {
                lines.push(format!("- {}", endpoint.endpoint));
                if let Some(function) = &endpoint.function {
                    lines.push(format!("  Function: {function}"));
                }
                if let Some(return_type) = &endpoint.return_type {
                    lines.push(format!("  Returns: {return_type}"));
                }
            }
            if rest > 0 {
                lines.push(format!("  ... and {rest} more {method} endpoints"));
            }
            lines.push(String::new());
        }
    }

    let style_rules = index.total_style_rules();
    if style_rules > 0 {
        lines.push("=== STYLE PATTERNS ===".to_string());
        lines.push(format!("Total StyleSheet Rules: {style_rules}"));
        let inline = index.files_with_inline_styles();
        if inline > 0 {
            lines.push(format!("Files with Inline Styles: {inline}"));
        }
        lines.push(String::new());
    }

    let security = index.security_by_issue();
    if !security.is_empty() {
        lines.push("=== SECURITY ANALYSIS ===".to_string());
        for (issue, concerns) in &security {
            lines.push(format!("{issue} ({} occurrences):", concerns.len()));
            let (visible, rest) = truncated(concerns, 5);
            for concern in visible {
                lines.push(format!(
                    "- In {}: `{}`",
                    base_name(&concern.file_path),
                    concern.context
                ));
            }
            if rest > 0 {
                lines.push(format!("  ... and {rest} more occurrences"));
            }
            lines.push(String::new());
        }
    }

    let summaries: Vec<_> = index
        .bundles()
        .iter()
        .filter(|b| !b.summary_lines.is_empty())
        .collect();
    if !summaries.is_empty() {
        lines.push("=== FILE SUMMARIES ===".to_string());
        for bundle in summaries {
            lines.push(format!("=== {} ===", bundle.rel_path));
            lines.extend(bundle.summary_lines.iter().cloned());
            lines.push(String::new());
            lines.push("-".repeat(80));
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractConfig;
    use crate::extractors::manager::aggregate_content;

    fn stats_for(index: &ProjectIndex) -> RunStats {
        RunStats {
            processed: index.bundles().len(),
            ..RunStats::default()
        }
    }

    fn sample_index() -> ProjectIndex {
        let mut index = ProjectIndex::new();
        let service = r#"
export class OrderService {
  async list(): Promise<Order[]> {
    return axios.get('/orders');
  }
}
"#;
        let config = ExtractConfig::default();
        index.merge(aggregate_content(service, "src/services/orders.ts", &config).unwrap());
        index.merge(
            aggregate_content(
                "export const Badge = () => { return (<View />); };",
                "src/Badge.tsx",
                &config,
            )
            .unwrap(),
        );
        index
    }

    #[test]
    fn sections_only_render_when_backed() {
        let index = sample_index();
        let output = render(&index, &stats_for(&index));
        assert!(output.contains("=== SERVICES ==="));
        assert!(output.contains("=== API ENDPOINTS ==="));
        assert!(!output.contains("=== DATABASE SCHEMAS ==="));
        assert!(!output.contains("=== STATE MANAGEMENT ==="));
    }

    #[test]
    fn output_is_deterministic() {
        let index = sample_index();
        let stats = stats_for(&index);
        assert_eq!(render(&index, &stats), render(&index, &stats));
    }

    #[test]
    fn file_summaries_carry_relative_paths() {
        let index = sample_index();
        let output = render(&index, &stats_for(&index));
        assert!(output.contains("=== src/services/orders.ts ==="));
        assert!(output.contains("=== src/Badge.tsx ==="));
    }

    #[test]
    fn header_reports_run_accounting() {
        let index = sample_index();
        let stats = RunStats {
            processed: 2,
            excluded: 1,
            skipped: 0,
            errored: 1,
        };
        let output = render(&index, &stats);
        assert!(output.contains("Total files processed: 2"));
        assert!(output.contains("Files with nothing to report: 1"));
        assert!(output.contains("Files with read errors: 1"));
        assert!(!output.contains("Files skipped"));
    }

    #[test]
    fn complexity_table_truncates_with_exact_remainder() {
        let mut source = String::new();
        for i in 0..22 {
            source.push_str(&format!(
                "export const Panel{i} = () => {{ return (<View />); }};\n"
            ));
        }
        for _ in 0..11 {
            source.push_str("if (flag) { total += 1; }\n");
        }

        let mut index = ProjectIndex::new();
        let config = ExtractConfig::default();
        index.merge(aggregate_content(&source, "src/panels.tsx", &config).unwrap());
        assert_eq!(index.complex_components().len(), 22);

        let output = render(&index, &stats_for(&index));
        let rows = output
            .lines()
            .filter(|l| l.ends_with("| 11 | panels.tsx"))
            .count();
        assert_eq!(rows, 20);
        assert!(output.contains("... and 2 more components"));
    }
}
