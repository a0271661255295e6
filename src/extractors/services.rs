//! Service-class recognizer.
//!
//! Only runs on files that opt in by naming convention: `Service` in the
//! file name or a `/services/` path segment. Within those files every class
//! declaration is treated as a service, with its methods, singleton markers
//! and endpoint URL literals.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::text;
use crate::extractors::base::{fact_id, MethodInfo, ParamInfo, ServiceFact};

static CLASS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:export\s+)?class\s+(\w+)(?:\s+extends\s+(\w+))?").expect("class pattern")
});

static METHOD_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:async\s+)?(\w+)\s*\(([^)]*)\)\s*(?::\s*([^{]+))?\s*\{")
        .expect("method pattern")
});

static PARAM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)(?::\s*([^,]+))?").expect("param pattern"));

static ENDPOINT_LITERALS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?:fetch|axios)\s*\(\s*['"`]([^'"`]+)['"`]"#,
        r#"(?:get|post|put|delete|patch)\s*\(\s*['"`]([^'"`]+)['"`]"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("endpoint literal pattern"))
    .collect()
});

/// Whether the file participates in service recognition at all.
pub fn is_service_file(file_path: &str) -> bool {
    let file_name = file_path.rsplit('/').next().unwrap_or(file_path);
    file_name.contains("Service") || file_path.contains("/services/")
}

pub fn recognize(content: &str, file_path: &str) -> Vec<ServiceFact> {
    if !is_service_file(file_path) {
        return Vec::new();
    }

    // The singleton check is file-scoped; a file declaring getInstance and a
    // private constructor marks every class it declares.
    let singleton = content.contains("getInstance") && content.contains("private constructor");

    let mut services = Vec::new();
    for caps in CLASS_DECL.captures_iter(content) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let tail = &content[start..];

        let methods: Vec<MethodInfo> = METHOD_DECL
            .captures_iter(tail)
            .filter_map(|c| {
                let method_name = c.get(1).map(|m| m.as_str()).unwrap_or_default();
                if method_name == "constructor" || method_name == "render" {
                    return None;
                }
                Some(MethodInfo {
                    name: method_name.to_string(),
                    params: parse_params(c.get(2).map(|m| m.as_str()).unwrap_or("")),
                    return_type: c.get(3).map(|m| m.as_str().trim().to_string()),
                })
            })
            .collect();

        let mut endpoints = Vec::new();
        for pattern in ENDPOINT_LITERALS.iter() {
            for c in pattern.captures_iter(tail) {
                if let Some(url) = c.get(1) {
                    endpoints.push(url.as_str().to_string());
                }
            }
        }

        services.push(ServiceFact {
            id: fact_id(file_path, name, text::line_of(content, start)),
            name: name.to_string(),
            file_path: file_path.to_string(),
            parent_class: caps.get(2).map(|m| m.as_str().to_string()),
            singleton,
            methods,
            endpoints,
        });
    }

    services
}

fn parse_params(params_text: &str) -> Vec<ParamInfo> {
    if params_text.trim().is_empty() {
        return Vec::new();
    }
    PARAM_NAME
        .captures_iter(params_text)
        .map(|c| {
            ParamInfo::new(
                c.get(1).map(|m| m.as_str()).unwrap_or_default(),
                c.get(2).map(|m| m.as_str().trim()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
export class AuthService extends BaseService {
  private static instance: AuthService;
  private constructor() {}

  static getInstance(): AuthService {
    return AuthService.instance;
  }

  async login(email: string, password: string): Promise<Session> {
    return axios.post('/auth/login', { email, password });
  }

  logout() {
    return fetch('/auth/logout');
  }
}
"#;

    #[test]
    fn requires_service_naming_convention() {
        assert!(recognize(SAMPLE, "src/components/Button.tsx").is_empty());
        assert!(!recognize(SAMPLE, "src/services/auth.ts").is_empty());
        assert!(!recognize(SAMPLE, "src/AuthService.ts").is_empty());
    }

    #[test]
    fn captures_class_methods_and_parent() {
        let services = recognize(SAMPLE, "src/services/auth.ts");
        assert_eq!(services.len(), 1);
        let svc = &services[0];
        assert_eq!(svc.name, "AuthService");
        assert_eq!(svc.parent_class.as_deref(), Some("BaseService"));
        let method_names: Vec<&str> = svc.methods.iter().map(|m| m.name.as_str()).collect();
        assert!(method_names.contains(&"login"));
        assert!(method_names.contains(&"logout"));
        assert!(
            !method_names.contains(&"constructor"),
            "constructor is not a service method"
        );
        let login = svc.methods.iter().find(|m| m.name == "login").unwrap();
        assert_eq!(login.return_type.as_deref(), Some("Promise<Session>"));
        assert_eq!(login.params.len(), 2);
    }

    #[test]
    fn detects_singleton_and_endpoints() {
        let services = recognize(SAMPLE, "src/services/auth.ts");
        let svc = &services[0];
        assert!(svc.singleton);
        assert!(svc.endpoints.iter().any(|e| e == "/auth/login"));
        assert!(svc.endpoints.iter().any(|e| e == "/auth/logout"));
    }
}
