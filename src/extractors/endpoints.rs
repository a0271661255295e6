//! Network-endpoint recognizer.
//!
//! Each pattern family (fetch, axios, api client, bare REST verb) reports
//! its own occurrences; a call matching several families is reported once
//! per family, never deduplicated.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::text;
use crate::extractors::base::{EndpointFact, HttpMethod};

static ENDPOINT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"fetch\(['"]([^'"]+)['"](?:,\s*(\{[^}]+\}))?\)"#,
        r#"axios\.(?:get|post|put|delete|patch)\(['"]([^'"]+)['"](?:,\s*([^,)]+))?\)"#,
        r#"api\.(?:get|post|put|delete|patch)\(['"]([^'"]+)['"](?:,\s*([^,)]+))?\)"#,
        r#"(?:get|post|put|delete|patch)\(['"]([^'"]+)['"](?:,\s*([^,)]+))?\)"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("endpoint pattern"))
    .collect()
});

fn method_of(matched: &str) -> HttpMethod {
    let lower = matched.to_lowercase();
    if lower.contains("post(") {
        HttpMethod::Post
    } else if lower.contains("put(") {
        HttpMethod::Put
    } else if lower.contains("delete(") {
        HttpMethod::Delete
    } else if lower.contains("patch(") {
        HttpMethod::Patch
    } else {
        HttpMethod::Get
    }
}

pub fn recognize(content: &str, file_path: &str) -> Vec<EndpointFact> {
    let mut endpoints = Vec::new();

    for pattern in ENDPOINT_PATTERNS.iter() {
        for caps in pattern.captures_iter(content) {
            let Some(whole) = caps.get(0) else { continue };
            endpoints.push(EndpointFact {
                endpoint: caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
                method: method_of(whole.as_str()),
                function: text::enclosing_declaration(content, whole.start()),
                return_type: text::enclosing_return_type(content, whole.start()),
                file_path: file_path.to_string(),
            });
        }
    }

    endpoints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_inferred_from_call_shape() {
        let content = r#"
async function createUser(data) {
  return axios.post('/users', data);
}
"#;
        let endpoints = recognize(content, "src/api/users.ts");
        let post = endpoints.iter().find(|e| e.method == HttpMethod::Post).unwrap();
        assert_eq!(post.endpoint, "/users");
        assert_eq!(post.function.as_deref(), Some("createUser"));
    }

    #[test]
    fn return_type_read_from_annotated_arrow() {
        let content = r#"
const loadUser = (id: string): Promise<User> => {
  return api.get('/users');
};
"#;
        let endpoints = recognize(content, "src/api/users.ts");
        assert!(endpoints
            .iter()
            .all(|e| e.return_type.as_deref() == Some("Promise<User>")));
        assert!(!endpoints.is_empty());
    }

    #[test]
    fn fetch_defaults_to_get() {
        let endpoints = recognize("const r = fetch('/health')", "src/api/health.ts");
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].method, HttpMethod::Get);
        assert_eq!(endpoints[0].endpoint, "/health");
    }

    #[test]
    fn overlapping_families_each_report() {
        // axios.get matches both the axios family and the bare verb family.
        let endpoints = recognize("axios.get('/items')", "src/api/items.ts");
        assert_eq!(endpoints.len(), 2);
        assert!(endpoints.iter().all(|e| e.endpoint == "/items"));
        assert!(endpoints.iter().all(|e| e.method == HttpMethod::Get));
    }
}
