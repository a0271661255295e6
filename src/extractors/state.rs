//! State-management recognizer: redux reducers/slices/actions and
//! context/provider declarations.
//!
//! Redux recognition only fires when at least two distinct redux indicator
//! tokens appear in the file, so a stray `Provider` import does not turn
//! every file into a store.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::{StatePatternFact, StatePatternKind};

const REDUX_INDICATORS: [&str; 6] = [
    "createStore",
    "createSlice",
    "useDispatch",
    "useSelector",
    "combineReducers",
    "Provider",
];

static REDUCER_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:export\s+)?(?:const|function)\s+(\w+)Reducer\s*=").expect("reducer pattern")
});

static SLICE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:export\s+)?const\s+(\w+)Slice\s*=\s*createSlice\(").expect("slice pattern")
});

static ACTION_DESTRUCTURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:export\s+)?const\s+\{\s*([^}]+)\s*\}\s*=\s*(\w+)Slice\.actions")
        .expect("action pattern")
});

static CONTEXT_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:export\s+)?const\s+(\w+)Context\s*=\s*(?:React\.)?createContext\(")
        .expect("context pattern")
});

static PROVIDER_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:export\s+)?(?:const|function)\s+(\w+)Provider\s*=\s*\(\s*\{\s*children\s*\}")
        .expect("provider pattern")
});

pub fn recognize(content: &str, file_path: &str) -> Vec<StatePatternFact> {
    let mut patterns = Vec::new();

    let redux_count = REDUX_INDICATORS
        .iter()
        .filter(|ind| content.contains(*ind))
        .count();

    if redux_count >= 2 {
        for caps in REDUCER_DECL.captures_iter(content) {
            let stem = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            patterns.push(StatePatternFact {
                kind: StatePatternKind::ReduxReducer,
                name: format!("{stem}Reducer"),
                slice: None,
                file_path: file_path.to_string(),
            });
        }

        for caps in SLICE_DECL.captures_iter(content) {
            let stem = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            patterns.push(StatePatternFact {
                kind: StatePatternKind::ReduxSlice,
                name: format!("{stem}Slice"),
                slice: None,
                file_path: file_path.to_string(),
            });
        }

        for caps in ACTION_DESTRUCTURE.captures_iter(content) {
            let slice = caps.get(2).map(|m| m.as_str().to_string());
            for action in caps
                .get(1)
                .map(|m| m.as_str())
                .unwrap_or("")
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
            {
                patterns.push(StatePatternFact {
                    kind: StatePatternKind::ReduxAction,
                    name: action.to_string(),
                    slice: slice.clone(),
                    file_path: file_path.to_string(),
                });
            }
        }
    }

    if content.contains("createContext") {
        for caps in CONTEXT_DECL.captures_iter(content) {
            let stem = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            patterns.push(StatePatternFact {
                kind: StatePatternKind::Context,
                name: format!("{stem}Context"),
                slice: None,
                file_path: file_path.to_string(),
            });
        }

        for caps in PROVIDER_DECL.captures_iter(content) {
            let stem = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            patterns.push(StatePatternFact {
                kind: StatePatternKind::ContextProvider,
                name: format!("{stem}Provider"),
                slice: None,
                file_path: file_path.to_string(),
            });
        }
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redux_needs_two_indicators() {
        let single = "import { Provider } from 'react-redux';\nconst authReducer = (s) => s;";
        assert!(recognize(single, "src/store.ts").is_empty());

        let real = r#"
import { createSlice } from '@reduxjs/toolkit';
import { useDispatch } from 'react-redux';

export const cartSlice = createSlice({ name: 'cart' });
export const { addItem, removeItem } = cartSlice.actions;
"#;
        let patterns = recognize(real, "src/store/cart.ts");
        assert!(patterns
            .iter()
            .any(|p| p.kind == StatePatternKind::ReduxSlice && p.name == "cartSlice"));
        let actions: Vec<&StatePatternFact> = patterns
            .iter()
            .filter(|p| p.kind == StatePatternKind::ReduxAction)
            .collect();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].name, "addItem");
        assert_eq!(actions[0].slice.as_deref(), Some("cart"));
    }

    #[test]
    fn context_and_provider_declarations() {
        let content = r#"
export const ThemeContext = React.createContext(null);
export const ThemeProvider = ({ children }) => (
  <ThemeContext.Provider value={theme}>{children}</ThemeContext.Provider>
);
"#;
        let patterns = recognize(content, "src/theme.tsx");
        assert!(patterns
            .iter()
            .any(|p| p.kind == StatePatternKind::Context && p.name == "ThemeContext"));
        assert!(patterns
            .iter()
            .any(|p| p.kind == StatePatternKind::ContextProvider && p.name == "ThemeProvider"));
    }
}
