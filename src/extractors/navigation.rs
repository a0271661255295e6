//! Routing recognizer: screen registrations and navigation transitions.
//!
//! Declarative `<Stack.Screen>` registrations and transition calls are
//! recognized in any file; navigator-map declarations
//! (`createStackNavigator({...})`) only in files whose path names them a
//! navigation concern.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::text;
use crate::extractors::base::{RouteFact, TransitionFact};

static SCREEN_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<(Stack|Tabs|Tab|Drawer)\.Screen\s+name=['"]([^'"]+)['"](?:\s+component=\{([^}]+)\})?"#,
    )
    .expect("screen pattern")
});

static NAVIGATOR_MAP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"create(Stack|BottomTab|Drawer)Navigator\(\s*\{\s*([^}]+)\s*\}\s*\)")
        .expect("navigator map pattern")
});

static MAP_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z0-9_]+)\s*:\s*([A-Za-z0-9_]+)").expect("map entry pattern"));

static TRANSITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:router|navigation)\.(?:push|navigate)\(\s*['"]([^'"]+)['"](?:\s*,\s*(\{[^}]+\}))?\s*\)"#,
    )
    .expect("transition pattern")
});

/// Whether navigator-map declarations are expected in this file.
fn is_navigation_file(file_path: &str) -> bool {
    let lower = file_path.to_lowercase();
    lower.contains("navigation") || lower.contains("router")
}

pub fn routes(content: &str, file_path: &str) -> Vec<RouteFact> {
    let mut routes = Vec::new();

    for caps in SCREEN_DECL.captures_iter(content) {
        routes.push(RouteFact {
            name: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            navigator: caps.get(1).map(|m| m.as_str().to_string()),
            component: caps.get(3).map(|m| m.as_str().trim().to_string()),
            file_path: file_path.to_string(),
        });
    }

    if is_navigation_file(file_path) {
        for caps in NAVIGATOR_MAP.captures_iter(content) {
            let navigator = caps.get(1).map(|m| m.as_str().to_string());
            let body = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            for entry in MAP_ENTRY.captures_iter(body) {
                routes.push(RouteFact {
                    name: entry
                        .get(1)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default(),
                    navigator: navigator.clone(),
                    component: entry.get(2).map(|m| m.as_str().to_string()),
                    file_path: file_path.to_string(),
                });
            }
        }
    }

    routes
}

pub fn transitions(content: &str, file_path: &str) -> Vec<TransitionFact> {
    TRANSITION
        .captures_iter(content)
        .map(|caps| {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            TransitionFact {
                to: caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
                params: caps.get(2).map(|m| m.as_str().to_string()),
                context: text::context_snippet(content, start, 120),
                file_path: file_path.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_registrations_found_in_any_file() {
        let content = r#"
<Stack.Screen name="Home" component={HomeScreen} />
<Tabs.Screen name="Settings" />
"#;
        let routes = routes(content, "app/layout.tsx");
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].name, "Home");
        assert_eq!(routes[0].navigator.as_deref(), Some("Stack"));
        assert_eq!(routes[0].component.as_deref(), Some("HomeScreen"));
        assert_eq!(routes[1].component, None);
    }

    #[test]
    fn navigator_maps_require_navigation_path() {
        let content = "const nav = createStackNavigator({ Home: HomeScreen, Login: LoginScreen })";
        assert!(routes(content, "src/components/Button.tsx").is_empty());

        let found = routes(content, "src/navigation/stack.ts");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Home");
        assert_eq!(found[0].component.as_deref(), Some("HomeScreen"));
        assert_eq!(found[0].navigator.as_deref(), Some("Stack"));
    }

    #[test]
    fn transitions_capture_target_and_params() {
        let content = r#"
const onPress = () => {
  router.push('/profile', { id: userId });
  navigation.navigate('Login');
};
"#;
        let found = transitions(content, "src/screens/Home.tsx");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].to, "/profile");
        assert_eq!(found[0].params.as_deref(), Some("{ id: userId }"));
        assert_eq!(found[1].to, "Login");
        assert_eq!(found[1].params, None);
        assert!(found[0].context.contains("router.push"));
    }
}
