//! Human-readable outline encoding (markdown).

use crate::index::ProjectIndex;
use crate::render::{base_name, truncated};
use crate::runner::RunStats;

pub fn render(index: &ProjectIndex, stats: &RunStats) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Code Context".to_string());
    lines.push(String::new());
    lines.push(format!("Files processed: **{}**", stats.processed));
    if stats.excluded > 0 {
        lines.push(format!("Files without reportable facts: {}", stats.excluded));
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
        lines.push("## Component Complexity".to_string());
        lines.push(String::new());
        lines.push("| Component | Complexity | File |".to_string());
        lines.push("|-----------|------------|------|".to_string());
        for entry in &complex {
            lines.push(format!(
                "| {} | {} | {} |",
                entry.name,
                entry.complexity,
                base_name(&entry.file_path)
            ));
        }
        let total = index.complex_components().len();
        if total > 20 {
            lines.push(String::new());
            lines.push(format!("... and {} more components", total - 20));
        }
        lines.push(String::new());
    }

    let hooks: Vec<_> = index.hooks().collect();
    if !hooks.is_empty() {
        lines.push("## Custom Hooks".to_string());
        lines.push(String::new());
        for hook in &hooks {
            let params = hook
                .params
                .iter()
                .map(|p| format!("{}: {}", p.name, p.ty))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!(
                "- **{}**({params}) in `{}`",
                hook.name,
                base_name(&hook.file_path)
            ));
            if !hook.states.is_empty() {
                lines.push(format!("  - state variables: {}", hook.states.len()));
            }
            if !hook.effects.is_empty() {
                lines.push(format!("  - effects: {}", hook.effects.len()));
            }
        }
        lines.push(String::new());
    }

    let services: Vec<_> = index.services().collect();
    if !services.is_empty() {
        lines.push("## Services".to_string());
        lines.push(String::new());
        lines.push("| Service | Methods | Singleton | File |".to_string());
        lines.push("|---------|---------|-----------|------|".to_string());
        for service in &services {
            lines.push(format!(
                "| {} | {} | {} | {} |",
                service.name,
                service.methods.len(),
                if service.singleton { "yes" } else { "no" },
                base_name(&service.file_path)
            ));
        }
        lines.push(String::new());
    }

    let interfaces: Vec<_> = index.interfaces().collect();
    if !interfaces.is_empty() {
        lines.push("## Interfaces".to_string());
        lines.push(String::new());
        lines.push("| Interface | Properties | Extends |".to_string());
        lines.push("|-----------|------------|---------|".to_string());
        for interface in &interfaces {
            let parents = if interface.parents.is_empty() {
                "-".to_string()
            } else {
                interface.parents.join(", ")
            };
            lines.push(format!(
                "| {} | {} | {parents} |",
                interface.name,
                interface.properties.len()
            ));
        }
        lines.push(String::new());
    }

    let tallies = index.alias_category_tallies();
    if !tallies.is_empty() {
        lines.push("## Type Alias Categories".to_string());
        lines.push(String::new());
        for (category, count) in &tallies {
            lines.push(format!("- {category}: {count}"));
        }
        lines.push(String::new());
    }

    let by_method = index.endpoints_by_method();
    if !by_method.is_empty() {
        lines.push("## API Endpoints".to_string());
        lines.push(String::new());
        for (method, endpoints) in &by_method {
            lines.push(format!("### {method} ({})", endpoints.len()));
            lines.push(String::new());
            let (visible, rest) = truncated(endpoints, 3);
            for endpoint in visible {
                let function = endpoint
                    .function
                    .as_ref()
                    .map(|f| format!(" via `{f}`"))
                    .unwrap_or_default();
                lines.push(format!("- `{}`{function}", endpoint.endpoint));
            }
            if rest > 0 {
                lines.push(format!("- ... and {rest} more {method} endpoints"));
            }
            lines.push(String::new());
        }
    }

    let routes: Vec<_> = index.routes().collect();
    if !routes.is_empty() {
        lines.push("## Navigation Routes".to_string());
        lines.push(String::new());
        for route in &routes {
            let component = route
                .component
                .as_ref()
                .map(|c| format!(" -> `{c}`"))
                .unwrap_or_default();
            lines.push(format!("- {}{component}", route.name));
        }
        lines.push(String::new());
    }

    let state_patterns: Vec<_> = index.state_patterns().collect();
    if !state_patterns.is_empty() {
        lines.push("## State Management".to_string());
        lines.push(String::new());
        for pattern in &state_patterns {
            lines.push(format!(
                "- {} `{}` in `{}`",
                pattern.kind,
                pattern.name,
                base_name(&pattern.file_path)
            ));
        }
        lines.push(String::new());
    }

    let tables: Vec<_> = index.tables().collect();
    if !tables.is_empty() {
        lines.push("## Database Schemas".to_string());
        lines.push(String::new());
        for table in &tables {
            lines.push(format!("### {}", table.table));
            lines.push(String::new());
            lines.push("| Column | Type | Nullable | Default |".to_string());
            lines.push("|--------|------|----------|---------|".to_string());
            for column in &table.columns {
                lines.push(format!(
                    "| {} | {} | {} | {} |",
                    column.name,
                    column.ty,
                    if column.nullable { "yes" } else { "no" },
                    column.default.as_deref().unwrap_or("-")
                ));
            }
            for fk in &table.foreign_keys {
                lines.push(String::new());
                lines.push(format!(
                    "Foreign key: `{}` -> `{}.{}`",
                    fk.column, fk.ref_table, fk.ref_column
                ));
            }
            lines.push(String::new());
        }
    }

    let security = index.security_by_issue();
    if !security.is_empty() {
        lines.push("## Security".to_string());
        lines.push(String::new());
        for (issue, concerns) in &security {
            lines.push(format!("- **{issue}**: {} occurrences", concerns.len()));
        }
        lines.push(String::new());
    }

    let summaries: Vec<_> = index
        .bundles()
        .iter()
        .filter(|b| !b.summary_lines.is_empty())
        .collect();
    if !summaries.is_empty() {
        lines.push("## Files".to_string());
        lines.push(String::new());
        for bundle in summaries {
            lines.push(format!("### {}", bundle.rel_path));
            lines.push(String::new());
            lines.push("```".to_string());
            lines.extend(bundle.summary_lines.iter().cloned());
            lines.push("```".to_string());
            lines.push(String::new());
        }
    }

    lines.join("\n")
}
