//! Type-declaration recognizer: interfaces, type aliases, enums, and the
//! soft relationship edges between them.
//!
//! Alias categorization applies a fixed predicate priority so a definition
//! satisfying several predicates always lands in one category:
//! union > intersection > utility > function > tuple > object > basic.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::text;
use crate::extractors::base::{
    fact_id, EdgeKind, EnumFact, EnumValue, InterfaceFact, ParamInfo, RelationshipEdge,
    TypeAliasFact, TypeCategory,
};

static INTERFACE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:export\s+)?interface\s+(\w+)(?:<[^>]*>)?\s*(?:extends\s+([^{]+))?\s*\{")
        .expect("interface pattern")
});

static PROPERTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\??\s*:\s*([^;]+);").expect("property pattern"));

static ALIAS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:export\s+)?type\s+(\w+)(?:<[^>]*>)?\s*=\s*([^;]+);").expect("alias pattern")
});

static ENUM_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:export\s+)?enum\s+(\w+)\s*\{").expect("enum pattern"));

static ENUM_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)(?:\s*=\s*([^,\n}]+))?").expect("enum value pattern"));

static TYPE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]\w+\b").expect("type name pattern"));

/// Everything the type recognizer produced for one file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TypeFacts {
    pub interfaces: Vec<InterfaceFact>,
    pub aliases: Vec<TypeAliasFact>,
    pub enums: Vec<EnumFact>,
    pub edges: Vec<RelationshipEdge>,
}

pub fn recognize(content: &str, file_path: &str) -> TypeFacts {
    let mut facts = TypeFacts::default();

    for caps in INTERFACE_DECL.captures_iter(content) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let body = text::balanced_body(content, start);

        let parents: Vec<String> = caps
            .get(2)
            .map(|m| {
                m.as_str()
                    .split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        for parent in &parents {
            facts.edges.push(RelationshipEdge {
                from: name.to_string(),
                to: parent.clone(),
                kind: EdgeKind::Extends,
            });
        }

        facts.interfaces.push(InterfaceFact {
            id: fact_id(file_path, name, text::line_of(content, start)),
            name: name.to_string(),
            file_path: file_path.to_string(),
            parents,
            properties: PROPERTY
                .captures_iter(body)
                .map(|c| {
                    ParamInfo::new(
                        c.get(1).map(|m| m.as_str()).unwrap_or_default(),
                        c.get(2).map(|m| m.as_str().trim()),
                    )
                })
                .collect(),
        });
    }

    for caps in ALIAS_DECL.captures_iter(content) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let definition = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        for referenced in type_references(&definition) {
            facts.edges.push(RelationshipEdge {
                from: name.to_string(),
                to: referenced,
                kind: EdgeKind::References,
            });
        }

        facts.aliases.push(TypeAliasFact {
            id: fact_id(file_path, name, text::line_of(content, start)),
            name: name.to_string(),
            file_path: file_path.to_string(),
            category: categorize(&definition),
            definition,
        });
    }

    for caps in ENUM_DECL.captures_iter(content) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let body = text::balanced_body(content, start);
        // Only the text inside the braces carries values; scanning from the
        // declaration head would mistake keywords and the enum name for
        // members.
        let inner = body.trim_start_matches('{').trim_end_matches('}');

        facts.enums.push(EnumFact {
            id: fact_id(file_path, name, text::line_of(content, start)),
            name: name.to_string(),
            file_path: file_path.to_string(),
            values: ENUM_VALUE
                .captures_iter(inner)
                .map(|c| EnumValue {
                    name: c.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
                    value: c.get(2).map(|m| m.as_str().trim().to_string()),
                })
                .collect(),
        });
    }

    facts
}

/// Fixed-priority classification of an alias right-hand side.
pub fn categorize(definition: &str) -> TypeCategory {
    if definition.contains('|') {
        TypeCategory::Union
    } else if definition.contains('&') {
        TypeCategory::Intersection
    } else if definition.starts_with("Record<") || definition.starts_with("Partial<") {
        TypeCategory::Utility
    } else if definition.starts_with('{') && definition.contains("=>") {
        TypeCategory::Function
    } else if definition.starts_with('[') && definition.contains(']') {
        TypeCategory::Tuple
    } else if definition.contains('{') && definition.contains('}') {
        TypeCategory::Object
    } else {
        TypeCategory::Basic
    }
}

/// Capitalized identifiers in a definition, excluding ones sitting inside
/// string literals. The literal check inspects the bytes adjacent to the
/// match for a quote delimiter.
pub fn type_references(definition: &str) -> Vec<String> {
    let bytes = definition.as_bytes();
    TYPE_NAME
        .find_iter(definition)
        .filter(|m| {
            let before = m.start().checked_sub(1).map(|i| bytes[i]);
            let after = bytes.get(m.end()).copied();
            let quoted = |b: Option<u8>| matches!(b, Some(b'\'') | Some(b'"') | Some(b'`'));
            !quoted(before) && !quoted(after)
        })
        .map(|m| m.as_str().to_string())
        .collect()
}
