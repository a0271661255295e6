//! UI component recognizer.
//!
//! Components are detected from anchored lexical signatures, not grammar:
//! an uppercase-named binding (`export const Foo = (...) =>`,
//! `function Foo(...)`) or a `class Foo extends Component` form. Ambiguous
//! or partial matches are accepted; over-reporting is preferred over
//! missing a declaration, since the report is advisory.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::text;
use crate::extractors::base::{fact_id, ComponentFact, ComponentKind, ParamInfo, StateFlow};

static FUNC_COMPONENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:export\s+)?(?:const|function)\s+([A-Z][a-zA-Z0-9_]*)\s*(?:<.*?>)?\s*(?:=\s*(?:\([^)]*\)|[^=]*)\s*=>|[(\{])",
    )
    .expect("functional component pattern")
});

static CLASS_COMPONENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"class\s+([A-Z][a-zA-Z0-9_]*)\s+extends\s+(?:React\.)?Component")
        .expect("class component pattern")
});

static PROPS_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\s*(?:\{\s*([^}]*)\s*\}|\s*props\s*|\s*([^)]*)\s*)").expect("props pattern")
});

static PROP_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)(?::\s*([^,\s]+))?").expect("prop name pattern"));

static HOOK_USAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"use[A-Z][a-zA-Z0-9]*").expect("hook usage pattern"));

static STATE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"const\s+\[\s*(\w+)\s*,\s*set(\w+)\s*\]\s*=\s*useState").expect("state pattern")
});

/// The network call shapes counted against a component. Occurrences may
/// match more than one family and are reported once per family.
pub(crate) static API_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"([a-zA-Z0-9_]+)\.(?:get|post|put|delete|patch)\(",
        r"fetch\(",
        r"axios\.(?:get|post|put|delete|patch)\(",
        r"api\.(?:[a-zA-Z0-9_]+)\(",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("api call pattern"))
    .collect()
});

pub fn recognize(content: &str, file_path: &str) -> Vec<ComponentFact> {
    let mut components = Vec::new();

    for caps in FUNC_COMPONENT.captures_iter(content) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        // Providers and contexts are state-management declarations, handled
        // by the state recognizer.
        if name.ends_with("Provider") || name.ends_with("Context") {
            continue;
        }
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);

        let jsx_start = content[start..]
            .find("return (")
            .or_else(|| content[start..].find("return {"))
            .map(|offset| start + offset);

        // Hook usages are scanned up to the render start so hooks mentioned
        // inside markup attributes do not inflate the list.
        let hook_scope = jsx_start
            .map(|end| &content[..end])
            .unwrap_or(content);
        let hooks_used: Vec<String> = HOOK_USAGE
            .find_iter(hook_scope)
            .map(|m| m.as_str().to_string())
            .collect();

        components.push(ComponentFact {
            id: fact_id(file_path, name, text::line_of(content, start)),
            name: name.to_string(),
            kind: ComponentKind::Functional,
            file_path: file_path.to_string(),
            props: extract_props(content, start),
            hooks_used,
            api_calls: api_calls(content),
            complexity: 0,
            performance_issues: Vec::new(),
            platform_issues: Vec::new(),
            state_flows: Vec::new(),
        });
    }

    for caps in CLASS_COMPONENT.captures_iter(content) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);

        components.push(ComponentFact {
            id: fact_id(file_path, name, text::line_of(content, start)),
            name: name.to_string(),
            kind: ComponentKind::Class,
            file_path: file_path.to_string(),
            props: Vec::new(),
            hooks_used: Vec::new(),
            api_calls: api_calls(content),
            complexity: 0,
            performance_issues: Vec::new(),
            platform_issues: Vec::new(),
            state_flows: Vec::new(),
        });
    }

    components
}

/// All network call occurrences in the file, once per matching family.
pub(crate) fn api_calls(content: &str) -> Vec<String> {
    let mut calls = Vec::new();
    for pattern in API_PATTERNS.iter() {
        for m in pattern.find_iter(content) {
            calls.push(m.as_str().to_string());
        }
    }
    calls
}

/// Parameter list following the declaration, degraded to empty when no list
/// is found.
fn extract_props(content: &str, start: usize) -> Vec<ParamInfo> {
    let window_end = (start + 500).min(content.len());
    let mut end = window_end;
    while end > start && !content.is_char_boundary(end) {
        end -= 1;
    }
    let window = &content[start..end];

    let Some(caps) = PROPS_LIST.captures(window) else {
        return Vec::new();
    };
    let props_text = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or("");

    PROP_NAME
        .captures_iter(props_text)
        .map(|c| {
            ParamInfo::new(
                c.get(1).map(|m| m.as_str()).unwrap_or_default(),
                c.get(2).map(|m| m.as_str()),
            )
        })
        .collect()
}

/// State values passed down to children as prop bindings. Only computed when
/// data-flow tracking is enabled.
pub fn state_flows(content: &str) -> Vec<StateFlow> {
    let mut flows = Vec::new();
    for caps in STATE_DECL.captures_iter(content) {
        let state = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let Ok(passed) = Regex::new(&format!(
            r"<(\w+)[^>]*\b{}=\{{[^}}]*\}}",
            regex::escape(state)
        )) else {
            continue;
        };
        for child_caps in passed.captures_iter(content) {
            flows.push(StateFlow {
                state: state.to_string(),
                child: child_caps
                    .get(1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            });
        }
    }
    flows
}
