//! Hypertext encoding.
//!
//! Self-contained HTML document. All extracted text is escaped before it is
//! interpolated; nothing from the scanned tree reaches the markup raw.

use crate::index::ProjectIndex;
use crate::render::{base_name, truncated};
use crate::runner::RunStats;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render(index: &ProjectIndex, stats: &RunStats) -> String {
    let mut body: Vec<String> = Vec::new();

    body.push("<h1>Code Context</h1>".to_string());
    body.push(format!(
        "<p>Files processed: <strong>{}</strong></p>",
        stats.processed
    ));
    if stats.excluded + stats.skipped + stats.errored > 0 {
        body.push(format!(
            "<p>Without reportable facts: {} &middot; Skipped: {} &middot; Read errors: {}</p>",
            stats.excluded, stats.skipped, stats.errored
        ));
    }

    let complex = index.top_by_complexity(20);
    if !complex.is_empty() {
        body.push("<h2>Component Complexity</h2>".to_string());
        body.push("<table>".to_string());
        body.push(
            "<tr><th>Component</th><th>Complexity</th><th>File</th></tr>".to_string(),
        );
        for entry in &complex {
            body.push(format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&entry.name),
                entry.complexity,
                escape(base_name(&entry.file_path))
            ));
        }
        body.push("</table>".to_string());
    }

    let hooks: Vec<_> = index.hooks().collect();
    if !hooks.is_empty() {
        body.push("<h2>Custom Hooks</h2>".to_string());
        body.push("<ul>".to_string());
        for hook in &hooks {
            body.push(format!(
                "<li><code>{}</code> ({}) &mdash; {} state, {} effects</li>",
                escape(&hook.name),
                escape(base_name(&hook.file_path)),
                hook.states.len(),
                hook.effects.len()
            ));
        }
        body.push("</ul>".to_string());
    }

    let services: Vec<_> = index.services().collect();
    if !services.is_empty() {
        body.push("<h2>Services</h2>".to_string());
        body.push("<table>".to_string());
        body.push(
            "<tr><th>Service</th><th>Methods</th><th>Singleton</th><th>File</th></tr>"
                .to_string(),
        );
        for service in &services {
            body.push(format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&service.name),
                service.methods.len(),
                if service.singleton { "yes" } else { "no" },
                escape(base_name(&service.file_path))
            ));
        }
        body.push("</table>".to_string());
    }

    let interfaces: Vec<_> = index.interfaces().collect();
    if !interfaces.is_empty() {
        body.push("<h2>Interfaces</h2>".to_string());
        body.push("<table>".to_string());
        body.push("<tr><th>Interface</th><th>Properties</th><th>Extends</th></tr>".to_string());
        for interface in &interfaces {
            let parents = if interface.parents.is_empty() {
                "-".to_string()
            } else {
                escape(&interface.parents.join(", "))
            };
            body.push(format!(
                "<tr><td>{}</td><td>{}</td><td>{parents}</td></tr>",
                escape(&interface.name),
                interface.properties.len()
            ));
        }
        body.push("</table>".to_string());
    }

    let by_method = index.endpoints_by_method();
    if !by_method.is_empty() {
        body.push("<h2>API Endpoints</h2>".to_string());
        for (method, endpoints) in &by_method {
            body.push(format!("<h3>{method} ({})</h3>", endpoints.len()));
            body.push("<ul>".to_string());
            let (visible, rest) = truncated(endpoints, 10);
            for endpoint in visible {
                body.push(format!(
                    "<li><code>{}</code></li>",
                    escape(&endpoint.endpoint)
                ));
            }
            if rest > 0 {
                body.push(format!("<li>... and {rest} more {method} endpoints</li>"));
            }
            body.push("</ul>".to_string());
        }
    }

    let routes: Vec<_> = index.routes().collect();
    if !routes.is_empty() {
        body.push("<h2>Navigation Routes</h2>".to_string());
        body.push("<ul>".to_string());
        for route in &routes {
            let component = route
                .component
                .as_ref()
                .map(|c| format!(" &rarr; <code>{}</code>", escape(c)))
                .unwrap_or_default();
            body.push(format!("<li>{}{component}</li>", escape(&route.name)));
        }
        body.push("</ul>".to_string());
    }

    let state_patterns: Vec<_> = index.state_patterns().collect();
    if !state_patterns.is_empty() {
        body.push("<h2>State Management</h2>".to_string());
        body.push("<ul>".to_string());
        for pattern in &state_patterns {
            body.push(format!(
                "<li>{}: <code>{}</code> ({})</li>",
                pattern.kind,
                escape(&pattern.name),
                escape(base_name(&pattern.file_path))
            ));
        }
        body.push("</ul>".to_string());
    }

    let tables: Vec<_> = index.tables().collect();
    if !tables.is_empty() {
        body.push("<h2>Database Schemas</h2>".to_string());
        for table in &tables {
            body.push(format!("<h3>{}</h3>", escape(&table.table.to_string())));
            body.push("<table>".to_string());
            body.push(
                "<tr><th>Column</th><th>Type</th><th>Nullable</th><th>Default</th></tr>"
                    .to_string(),
            );
            for column in &table.columns {
                body.push(format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape(&column.name),
                    escape(&column.ty),
                    if column.nullable { "yes" } else { "no" },
                    escape(column.default.as_deref().unwrap_or("-"))
                ));
            }
            body.push("</table>".to_string());
        }
    }

    let security = index.security_by_issue();
    if !security.is_empty() {
        body.push("<h2>Security</h2>".to_string());
        body.push("<ul>".to_string());
        for (issue, concerns) in &security {
            body.push(format!(
                "<li><strong>{}</strong>: {} occurrences</li>",
                escape(issue),
                concerns.len()
            ));
        }
        body.push("</ul>".to_string());
    }

    let summaries: Vec<_> = index
        .bundles()
        .iter()
        .filter(|b| !b.summary_lines.is_empty())
        .collect();
    if !summaries.is_empty() {
        body.push("<h2>Files</h2>".to_string());
        for bundle in summaries {
            body.push(format!("<h3>{}</h3>", escape(&bundle.rel_path)));
            body.push("<pre>".to_string());
            for line in &bundle.summary_lines {
                body.push(escape(line));
            }
            body.push("</pre>".to_string());
        }
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Code Context</title>\n\
         <style>body{{font-family:sans-serif;margin:2em}}table{{border-collapse:collapse}}\
         td,th{{border:1px solid #ccc;padding:4px 8px;text-align:left}}\
         pre{{background:#f6f6f6;padding:8px}}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        body.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractConfig;
    use crate::extractors::manager::aggregate_content;

    #[test]
    fn markup_in_extracted_text_is_escaped() {
        let mut index = ProjectIndex::new();
        let content = "export const Alert = () => { return (<View a={\"<script>\"} />); };";
        let config = ExtractConfig::default();
        index.merge(aggregate_content(content, "src/<odd>.tsx", &config).unwrap());

        let stats = RunStats {
            processed: 1,
            ..RunStats::default()
        };
        let output = render(&index, &stats);
        assert!(output.contains("&lt;odd&gt;.tsx"));
        assert!(!output.contains("<odd>.tsx"));
    }

    #[test]
    fn document_is_self_contained() {
        let output = render(&ProjectIndex::new(), &RunStats::default());
        assert!(output.starts_with("<!DOCTYPE html>"));
        assert!(output.contains("</html>"));
    }
}
