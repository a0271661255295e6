//! Per-file aggregator.
//!
//! Opens one file, runs every recognizer over it, computes the derived facts
//! that need recognizer outputs combined (complexity scores, optional
//! heuristic issues), and pre-renders the file's summary lines. The summary
//! length is the reportable-line unit the run coordinator budgets on.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::config::ExtractConfig;
use crate::extractors::base::{ComponentFact, ComponentKind, FileBundle, ImportKind};
use crate::extractors::{
    call_sites, components, endpoints, heuristics, hooks, imports, navigation, schema, security,
    services, state, styles, types_ts,
};

/// Complexity above this marks a declaration as complex.
pub const COMPLEXITY_THRESHOLD: u32 = 10;

const CODE_EXTENSIONS: [&str; 4] = ["tsx", "ts", "jsx", "js"];

pub fn aggregate_file(path: &Path, rel_path: &str, config: &ExtractConfig) -> Result<FileBundle> {
    let bytes = fs::read(path).with_context(|| format!("reading {rel_path}"))?;
    let content = String::from_utf8_lossy(&bytes);
    aggregate_content(&content, rel_path, config)
}

/// Aggregation over already-loaded text; split out so tests can drive it
/// without touching the filesystem.
pub fn aggregate_content(
    content: &str,
    rel_path: &str,
    config: &ExtractConfig,
) -> Result<FileBundle> {
    let mut bundle = FileBundle::new(rel_path);
    let ext = extension_of(rel_path);

    // Table definitions can live in any file type.
    bundle.tables = schema::recognize(content, rel_path);

    if CODE_EXTENSIONS.contains(&ext.as_str()) {
        aggregate_code(content, rel_path, config, &mut bundle);
        bundle.summary_lines = code_summary(&bundle);
    } else if ext == "json" {
        bundle.summary_lines = json_summary(content, rel_path)?;
    } else {
        bundle.summary_lines = vec![format!("# {ext} file - detailed extraction not supported")];
    }

    debug!(
        file = rel_path,
        components = bundle.components.len(),
        summary_lines = bundle.summary_lines.len(),
        "aggregated file"
    );
    Ok(bundle)
}

fn aggregate_code(content: &str, rel_path: &str, config: &ExtractConfig, bundle: &mut FileBundle) {
    bundle.components = components::recognize(content, rel_path);
    bundle.hooks = hooks::recognize(content, rel_path);
    bundle.services = services::recognize(content, rel_path);

    let type_facts = types_ts::recognize(content, rel_path);
    bundle.interfaces = type_facts.interfaces;
    bundle.type_aliases = type_facts.aliases;
    bundle.enums = type_facts.enums;
    bundle.type_edges = type_facts.edges;

    bundle.routes = navigation::routes(content, rel_path);
    bundle.transitions = navigation::transitions(content, rel_path);
    bundle.state_patterns = state::recognize(content, rel_path);
    bundle.imports = imports::recognize(content, rel_path);
    bundle.endpoints = endpoints::recognize(content, rel_path);
    bundle.call_sites = call_sites::recognize(content, rel_path);
    bundle.styles = styles::stylesheets(content, rel_path);
    bundle.inline_style_count = styles::inline_style_count(content);
    bundle.security = security::recognize(content, rel_path);
    bundle.used_tags = imports::used_tags(content, &bundle.imports);

    let state_flows = if config.enable_data_flow_tracking {
        components::state_flows(content)
    } else {
        Vec::new()
    };

    for component in &mut bundle.components {
        component.complexity = complexity_of(component, content);
        if config.enable_performance_heuristics {
            component.performance_issues = heuristics::performance_issues(content, &component.name);
        }
        if config.enable_platform_heuristics {
            component.platform_issues = heuristics::platform_issues(content, &component.name);
        }
        if config.enable_data_flow_tracking {
            component.state_flows = state_flows.clone();
        }
    }
}

/// Complexity = distinct state-unit usages + call sites + conditional
/// markers. Class components have no hook usage and count their state
/// accesses instead.
fn complexity_of(component: &ComponentFact, content: &str) -> u32 {
    let conditionals = content.matches("if (").count() + content.matches("? ").count();
    let base = component.api_calls.len() + conditionals;
    let distinct_hooks: BTreeSet<&str> =
        component.hooks_used.iter().map(String::as_str).collect();
    let score = match component.kind {
        ComponentKind::Functional => base + distinct_hooks.len(),
        ComponentKind::Class => {
            base + content.matches("this.state").count() + content.matches("this.setState").count()
        }
    };
    score as u32
}

fn extension_of(rel_path: &str) -> String {
    Path::new(rel_path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn code_summary(bundle: &FileBundle) -> Vec<String> {
    let mut lines = Vec::new();

    if !bundle.imports.is_empty() {
        lines.push("# Imports:".to_string());
        for import in bundle.imports.iter().take(5) {
            match import.kind {
                ImportKind::Named => lines.push(format!(
                    "# import {{ {} }} from '{}'",
                    import.name.as_deref().unwrap_or_default(),
                    import.source
                )),
                ImportKind::Default => lines.push(format!(
                    "# import {} from '{}'",
                    import.name.as_deref().unwrap_or_default(),
                    import.source
                )),
                ImportKind::SideEffect => lines.push(format!("# import '{}'", import.source)),
            }
        }
        if bundle.imports.len() > 5 {
            lines.push(format!("# ... and {} more imports", bundle.imports.len() - 5));
        }
        lines.push(String::new());
    }

    if !bundle.components.is_empty() {
        lines.push("# Components:".to_string());
        for component in &bundle.components {
            lines.push(format!("Component: {} ({})", component.name, component.kind));
            if !component.props.is_empty() {
                lines.push("  Props:".to_string());
                for prop in &component.props {
                    lines.push(format!("    - {}: {}", prop.name, prop.ty));
                }
            }
            if !component.hooks_used.is_empty() {
                lines.push("  Hooks used:".to_string());
                for hook in &component.hooks_used {
                    lines.push(format!("    - {hook}"));
                }
            }
            if !component.api_calls.is_empty() {
                lines.push("  API calls:".to_string());
                for call in &component.api_calls {
                    lines.push(format!("    - {call}"));
                }
            }
            if !component.performance_issues.is_empty() {
                lines.push("  Performance issues:".to_string());
                for issue in &component.performance_issues {
                    lines.push(format!("    - {issue}"));
                }
            }
            if !component.platform_issues.is_empty() {
                lines.push("  Platform issues:".to_string());
                for issue in &component.platform_issues {
                    lines.push(format!("    - {issue}"));
                }
            }
            lines.push(String::new());
        }
    }

    if !bundle.hooks.is_empty() {
        lines.push("# Hooks:".to_string());
        for hook in &bundle.hooks {
            lines.push(format!("Hook: {}", hook.name));
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
            if !hook.uses_hooks.is_empty() {
                lines.push("  Uses hooks:".to_string());
                for used in &hook.uses_hooks {
                    lines.push(format!("    - {used}"));
                }
            }
            if !hook.api_calls.is_empty() {
                lines.push("  API calls:".to_string());
                for call in &hook.api_calls {
                    lines.push(format!("    - {call}"));
                }
            }
            lines.push(String::new());
        }
    }

    if !bundle.services.is_empty() {
        lines.push("# Services:".to_string());
        for service in &bundle.services {
            let singleton = if service.singleton { " (Singleton)" } else { "" };
            let parent = service
                .parent_class
                .as_ref()
                .map(|p| format!(" extends {p}"))
                .unwrap_or_default();
            lines.push(format!("Service: {}{singleton}{parent}", service.name));
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

    if !bundle.interfaces.is_empty() || !bundle.type_aliases.is_empty() || !bundle.enums.is_empty()
    {
        lines.push("# Type Definitions:".to_string());
        if !bundle.interfaces.is_empty() {
            lines.push("  Interfaces:".to_string());
            for interface in &bundle.interfaces {
                let parents = if interface.parents.is_empty() {
                    String::new()
                } else {
                    format!(" extends {}", interface.parents.join(", "))
                };
                lines.push(format!("    - {}{parents}", interface.name));
                for prop in &interface.properties {
                    lines.push(format!("      - {}: {}", prop.name, prop.ty));
                }
            }
        }
        if !bundle.type_aliases.is_empty() {
            lines.push("  Type Aliases:".to_string());
            for alias in &bundle.type_aliases {
                lines.push(format!("    - {} = {}", alias.name, alias.definition));
            }
        }
        if !bundle.enums.is_empty() {
            lines.push("  Enums:".to_string());
            for en in &bundle.enums {
                lines.push(format!("    - {}", en.name));
                for value in &en.values {
                    let assigned = value
                        .value
                        .as_ref()
                        .map(|v| format!(" = {v}"))
                        .unwrap_or_default();
                    lines.push(format!("      - {}{assigned}", value.name));
                }
            }
        }
        lines.push(String::new());
    }

    if !bundle.routes.is_empty() {
        lines.push("# Navigation:".to_string());
        for route in &bundle.routes {
            let component = route
                .component
                .as_ref()
                .map(|c| format!(" -> {c}"))
                .unwrap_or_default();
            lines.push(format!("  Route: {}{component}", route.name));
        }
        lines.push(String::new());
    }

    if !bundle.state_patterns.is_empty() {
        lines.push("# State Management:".to_string());
        let mut last_kind = None;
        for pattern in &bundle.state_patterns {
            if last_kind != Some(pattern.kind) {
                lines.push(format!("  {}:", pattern.kind));
                last_kind = Some(pattern.kind);
            }
            lines.push(format!("    - {}", pattern.name));
        }
        lines.push(String::new());
    }

    if !bundle.tables.is_empty() {
        lines.push("# Database Schema:".to_string());
        for table in &bundle.tables {
            lines.push(format!("  Table: {}", table.table));
            lines.push("    Columns:".to_string());
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
                    "      - {}: {} {nullable}{default}{pk}",
                    column.name, column.ty
                ));
            }
            if !table.foreign_keys.is_empty() {
                lines.push("    Foreign Keys:".to_string());
                for fk in &table.foreign_keys {
                    lines.push(format!(
                        "      - {} -> {}.{}",
                        fk.column, fk.ref_table, fk.ref_column
                    ));
                }
            }
        }
        lines.push(String::new());
    }

    lines
}

/// JSON files contribute a structural summary instead of code facts.
fn json_summary(content: &str, rel_path: &str) -> Result<Vec<String>> {
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(err) => bail!("invalid JSON in {rel_path}: {err}"),
    };

    let mut lines = vec!["# JSON Structure:".to_string()];

    if rel_path.ends_with("package.json") {
        if let Some(map) = value.as_object() {
            push_dependency_section(&mut lines, map, "dependencies", "# Dependencies:", 10);
            push_dependency_section(&mut lines, map, "devDependencies", "# Dev Dependencies:", 5);
            push_dependency_section(&mut lines, map, "scripts", "# Scripts:", 5);
        }
    } else if let Some(map) = value.as_object() {
        lines.push("# Top-level keys:".to_string());
        for (key, value) in map {
            lines.push(format!("#   {key}: {}", value_kind(value)));
        }
    }

    lines.push(String::new());
    Ok(lines)
}

fn push_dependency_section(
    lines: &mut Vec<String>,
    map: &serde_json::Map<String, serde_json::Value>,
    key: &str,
    header: &str,
    limit: usize,
) {
    let Some(entries) = map.get(key).and_then(|v| v.as_object()) else {
        return;
    };
    lines.push(header.to_string());
    for (name, value) in entries.iter().take(limit) {
        let rendered = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
        lines.push(format!("#   {name}: {rendered}"));
    }
    if entries.len() > limit {
        lines.push(format!("#   ... and {} more {key}", entries.len() - limit));
    }
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
