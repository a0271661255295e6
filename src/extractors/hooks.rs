//! Reusable-state-unit (custom hook) recognizer.
//!
//! A hook declaration is the same lexical signature as a component, with a
//! name starting with the reserved `use` prefix. Beyond the declaration
//! itself, the recognizer analyzes the hook body for state bindings, effect
//! dependency lists, and memoization wrappers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::text;
use crate::extractors::base::{fact_id, EffectInfo, HookFact, ParamInfo, StateBinding};
use crate::extractors::components;

static HOOK_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:export\s+)?(?:const|function)\s+(use[A-Z][a-zA-Z0-9_]*)\s*(?:<.*?>)?\s*(?:=\s*(?:\([^)]*\)|[^=]*)\s*=>|[(\{])",
    )
    .expect("hook declaration pattern")
});

static PARAM_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*([^)]*)\s*\)").expect("param list pattern"));

static PARAM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)(?::\s*([^,\s]+))?").expect("param name pattern"));

static STATE_BINDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"const\s+\[\s*(\w+)\s*,\s*set(\w+)\s*\]\s*=\s*useState(?:<[^>]*>)?\(([^)]*)\)")
        .expect("state binding pattern")
});

static HOOK_USAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(use[A-Z][a-zA-Z0-9]*)").expect("hook usage pattern"));

static EFFECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"useEffect\(\(\)\s*=>\s*\{([^}]+)\}\s*,\s*\[([^\]]*)\]\)")
        .expect("effect pattern")
});

static MEMOIZED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:useCallback|useMemo)\((?:\([^)]*\))?\s*=>\s*\{([^}]+)\}\s*,\s*\[([^\]]*)\]\)")
        .expect("memoization pattern")
});

pub fn recognize(content: &str, file_path: &str) -> Vec<HookFact> {
    let mut hooks = Vec::new();

    for caps in HOOK_DECL.captures_iter(content) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let tail = &content[start..];
        let body = text::balanced_body(content, start);

        let states: Vec<StateBinding> = STATE_BINDING
            .captures_iter(body)
            .map(|c| StateBinding {
                name: c.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
                setter: format!("set{}", c.get(2).map(|m| m.as_str()).unwrap_or_default()),
                initial_value: c
                    .get(3)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default(),
            })
            .collect();

        let returns: Vec<String> = states
            .iter()
            .map(|s| format!("[{}, {}]", s.name, s.setter))
            .collect();

        // Nested hook usage; the declaration's own name is not a usage.
        let uses_hooks: Vec<String> = HOOK_USAGE
            .find_iter(tail)
            .map(|m| m.as_str().to_string())
            .filter(|h| h != name)
            .collect();

        let effects: Vec<EffectInfo> = EFFECT
            .captures_iter(body)
            .map(|c| EffectInfo {
                dependencies: split_dependency_list(c.get(2).map(|m| m.as_str()).unwrap_or("")),
            })
            .collect();

        let mut callbacks = 0;
        let mut memos = 0;
        for m in MEMOIZED.find_iter(body) {
            if m.as_str().starts_with("useCallback") {
                callbacks += 1;
            } else {
                memos += 1;
            }
        }

        hooks.push(HookFact {
            id: fact_id(file_path, name, text::line_of(content, start)),
            name: name.to_string(),
            file_path: file_path.to_string(),
            params: extract_params(content, start),
            returns,
            uses_hooks,
            api_calls: components::api_calls(tail),
            states,
            effects,
            callbacks,
            memos,
        });
    }

    hooks
}

fn split_dependency_list(deps: &str) -> Vec<String> {
    let deps = deps.trim();
    if deps.is_empty() {
        return Vec::new();
    }
    deps.split(',').map(|d| d.trim().to_string()).collect()
}

/// Parameter list from the declaration window, degraded to empty when the
/// list is absent or truncated.
fn extract_params(content: &str, start: usize) -> Vec<ParamInfo> {
    let window_end = (start + 200).min(content.len());
    let mut end = window_end;
    while end > start && !content.is_char_boundary(end) {
        end -= 1;
    }
    let Some(caps) = PARAM_LIST.captures(&content[start..end]) else {
        return Vec::new();
    };
    let params_text = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    if params_text.trim().is_empty() {
        return Vec::new();
    }
    PARAM_NAME
        .captures_iter(params_text)
        .map(|c| {
            ParamInfo::new(
                c.get(1).map(|m| m.as_str()).unwrap_or_default(),
                c.get(2).map(|m| m.as_str()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
export const useProducts = (categoryId: string) => {
  const [products, setProducts] = useState([]);
  const [loading, setLoading] = useState(false);

  useEffect(() => {
    api.fetchProducts(categoryId)
  }, [categoryId]);

  const refresh = useCallback(() => {
    setLoading(true)
  }, [categoryId]);

  return { products, loading, refresh };
};
"#;

    #[test]
    fn recognizes_hook_with_params_and_state() {
        let hooks = recognize(SAMPLE, "src/hooks/useProducts.ts");
        assert_eq!(hooks.len(), 1);
        let hook = &hooks[0];
        assert_eq!(hook.name, "useProducts");
        assert_eq!(hook.params.len(), 1);
        assert_eq!(hook.params[0].name, "categoryId");
        assert_eq!(hook.params[0].ty, "string");
        assert_eq!(hook.states.len(), 2);
        assert_eq!(hook.returns, vec!["[products, setProducts]", "[loading, setLoading]"]);
    }

    #[test]
    fn tracks_effects_and_memoization() {
        let hooks = recognize(SAMPLE, "src/hooks/useProducts.ts");
        let hook = &hooks[0];
        assert_eq!(hook.effects.len(), 1);
        assert_eq!(hook.effects[0].dependencies, vec!["categoryId"]);
        assert_eq!(hook.callbacks, 1);
        assert_eq!(hook.memos, 0);
    }

    #[test]
    fn own_name_is_not_a_nested_usage() {
        let hooks = recognize(SAMPLE, "src/hooks/useProducts.ts");
        assert!(!hooks[0].uses_hooks.iter().any(|h| h == "useProducts"));
        assert!(hooks[0].uses_hooks.iter().any(|h| h == "useState"));
    }

    #[test]
    fn missing_param_list_degrades_to_empty() {
        let text = "export const useFlag = {";
        let hooks = recognize(text, "src/useFlag.ts");
        for hook in &hooks {
            assert!(hook.params.is_empty());
        }
    }

    #[test]
    fn recognizer_is_idempotent() {
        assert_eq!(
            recognize(SAMPLE, "a.ts"),
            recognize(SAMPLE, "a.ts"),
            "identical text must yield identical facts"
        );
    }
}
