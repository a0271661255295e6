// Fact records for the extraction pipeline.
//
// Every recognizer produces immutable value records from this module. A fact
// always carries the relative path of the file it was found in; nothing here
// is ever attributed to more than one file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named parameter or property with a best-effort type annotation.
///
/// When no annotation is found the type degrades to `"any"` rather than the
/// whole fact being dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParamInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl ParamInfo {
    pub fn new(name: impl Into<String>, ty: Option<&str>) -> Self {
        Self {
            name: name.into(),
            ty: ty.map(str::to_string).unwrap_or_else(|| "any".to_string()),
        }
    }
}

/// Declaration form of a UI component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Functional,
    Class,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentKind::Functional => write!(f, "functional"),
            ComponentKind::Class => write!(f, "class"),
        }
    }
}

/// State handed from a component to a child via a prop binding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateFlow {
    pub state: String,
    pub child: String,
}

/// A recognized UI component declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentFact {
    /// Stable id (md5 over file:name:line), for downstream dedup.
    pub id: String,
    pub name: String,
    pub kind: ComponentKind,
    pub file_path: String,
    pub props: Vec<ParamInfo>,
    pub hooks_used: Vec<String>,
    pub api_calls: Vec<String>,
    /// Distinct hook usages + call sites + conditional markers. Filled by
    /// the per-file aggregator, not the recognizer.
    pub complexity: u32,
    pub performance_issues: Vec<String>,
    pub platform_issues: Vec<String>,
    pub state_flows: Vec<StateFlow>,
}

/// A `const [x, setX] = useState(...)` binding inside a hook body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateBinding {
    pub name: String,
    pub setter: String,
    pub initial_value: String,
}

/// A `useEffect` occurrence with its dependency list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectInfo {
    pub dependencies: Vec<String>,
}

/// A recognized reusable-state-unit (custom hook) declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HookFact {
    pub id: String,
    pub name: String,
    pub file_path: String,
    pub params: Vec<ParamInfo>,
    /// `[state, setState]` pairs the hook exposes.
    pub returns: Vec<String>,
    pub uses_hooks: Vec<String>,
    pub api_calls: Vec<String>,
    pub states: Vec<StateBinding>,
    pub effects: Vec<EffectInfo>,
    pub callbacks: usize,
    pub memos: usize,
}

/// A method on a service class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodInfo {
    pub name: String,
    pub params: Vec<ParamInfo>,
    pub return_type: Option<String>,
}

/// A recognized service/client class declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceFact {
    pub id: String,
    pub name: String,
    pub file_path: String,
    pub parent_class: Option<String>,
    pub singleton: bool,
    pub methods: Vec<MethodInfo>,
    /// Endpoint URL strings found in the class body.
    pub endpoints: Vec<String>,
}

/// A recognized interface declaration with its declared parents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterfaceFact {
    pub id: String,
    pub name: String,
    pub file_path: String,
    pub parents: Vec<String>,
    pub properties: Vec<ParamInfo>,
}

/// Classification of a type-alias right-hand side.
///
/// A definition may satisfy several predicates; classification uses a fixed
/// priority: union > intersection > utility > function > tuple > object >
/// basic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    Union,
    Intersection,
    Utility,
    Function,
    Tuple,
    Object,
    Basic,
}

impl std::fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeCategory::Union => write!(f, "union"),
            TypeCategory::Intersection => write!(f, "intersection"),
            TypeCategory::Utility => write!(f, "utility"),
            TypeCategory::Function => write!(f, "function"),
            TypeCategory::Tuple => write!(f, "tuple"),
            TypeCategory::Object => write!(f, "object"),
            TypeCategory::Basic => write!(f, "basic"),
        }
    }
}

/// A recognized type-alias declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeAliasFact {
    pub id: String,
    pub name: String,
    pub file_path: String,
    pub definition: String,
    pub category: TypeCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub value: Option<String>,
}

/// A recognized enum declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnumFact {
    pub id: String,
    pub name: String,
    pub file_path: String,
    pub values: Vec<EnumValue>,
}

/// Kind of a soft, name-based relationship edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Extends,
    References,
    DeclaresChild,
    ForeignKey,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKind::Extends => write!(f, "extends"),
            EdgeKind::References => write!(f, "references"),
            EdgeKind::DeclaresChild => write!(f, "declares_child"),
            EdgeKind::ForeignKey => write!(f, "foreign_key"),
        }
    }
}

/// A directed association between two named entities.
///
/// Edges are soft: the target name may never have been declared anywhere in
/// the scanned tree. Dangling edges are expected and allowed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationshipEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// A recognized routing declaration (screen registration).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteFact {
    pub name: String,
    /// Navigator family the route is registered on (Stack, Tabs, Drawer).
    pub navigator: Option<String>,
    pub component: Option<String>,
    pub file_path: String,
}

/// A navigation transition call (`router.push`, `navigation.navigate`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransitionFact {
    pub to: String,
    pub params: Option<String>,
    pub context: String,
    pub file_path: String,
}

/// Kind of a recognized state-management declaration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatePatternKind {
    ReduxReducer,
    ReduxSlice,
    ReduxAction,
    Context,
    ContextProvider,
}

impl std::fmt::Display for StatePatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatePatternKind::ReduxReducer => write!(f, "Redux Reducer"),
            StatePatternKind::ReduxSlice => write!(f, "Redux Slice"),
            StatePatternKind::ReduxAction => write!(f, "Redux Action"),
            StatePatternKind::Context => write!(f, "Context"),
            StatePatternKind::ContextProvider => write!(f, "Context Provider"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatePatternFact {
    pub kind: StatePatternKind,
    pub name: String,
    /// Owning slice, for redux actions.
    pub slice: Option<String>,
    pub file_path: String,
}

/// Name of a persistence table: either a literal, or an interpolated
/// variable the recognizer could not resolve to a literal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TableName {
    Literal(String),
    Variable(String),
}

impl TableName {
    pub fn is_resolved(&self) -> bool {
        matches!(self, TableName::Literal(_))
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableName::Literal(name) => write!(f, "{}", name),
            TableName::Variable(name) => write!(f, "{} (variable)", name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub nullable: bool,
    pub default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForeignKeyDef {
    pub column: String,
    pub ref_table: TableName,
    pub ref_column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexDef {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// A recognized persistence-schema table definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableFact {
    pub table: TableName,
    pub columns: Vec<ColumnDef>,
    pub primary_keys: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyDef>,
    pub indices: Vec<IndexDef>,
    pub file_path: String,
}

/// Import statement form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Named,
    Default,
    SideEffect,
}

impl std::fmt::Display for ImportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportKind::Named => write!(f, "named"),
            ImportKind::Default => write!(f, "default"),
            ImportKind::SideEffect => write!(f, "side-effect"),
        }
    }
}

/// One imported binding (or a bare side-effect import).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportFact {
    pub kind: ImportKind,
    pub name: Option<String>,
    pub source: String,
    pub file_path: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Put => write!(f, "PUT"),
            HttpMethod::Delete => write!(f, "DELETE"),
            HttpMethod::Patch => write!(f, "PATCH"),
        }
    }
}

/// A recognized network endpoint reference with its call context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointFact {
    pub endpoint: String,
    pub method: HttpMethod,
    /// Best-effort name of the function containing the call.
    pub function: Option<String>,
    pub return_type: Option<String>,
    pub file_path: String,
}

/// Categories of tracked call expressions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CallCategory {
    Network,
    StateUpdate,
    Navigation,
}

impl std::fmt::Display for CallCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallCategory::Network => write!(f, "network"),
            CallCategory::StateUpdate => write!(f, "state_update"),
            CallCategory::Navigation => write!(f, "navigation"),
        }
    }
}

/// A recognized call expression matching a tracked category.
///
/// An occurrence may be reported once per pattern family it matches;
/// duplicates across families are accepted, not deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallSiteFact {
    pub category: CallCategory,
    pub text: String,
    pub enclosing: Option<String>,
    pub file_path: String,
}

/// A `StyleSheet.create` definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StyleFact {
    pub name: String,
    pub rule_count: usize,
    pub file_path: String,
}

/// A matched security-concern pattern with surrounding context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityConcern {
    pub issue: String,
    pub context: String,
    pub file_path: String,
}

/// Everything extracted from a single file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileBundle {
    pub rel_path: String,
    pub components: Vec<ComponentFact>,
    pub hooks: Vec<HookFact>,
    pub services: Vec<ServiceFact>,
    pub interfaces: Vec<InterfaceFact>,
    pub type_aliases: Vec<TypeAliasFact>,
    pub enums: Vec<EnumFact>,
    pub type_edges: Vec<RelationshipEdge>,
    pub routes: Vec<RouteFact>,
    pub transitions: Vec<TransitionFact>,
    pub state_patterns: Vec<StatePatternFact>,
    pub tables: Vec<TableFact>,
    pub imports: Vec<ImportFact>,
    pub endpoints: Vec<EndpointFact>,
    pub call_sites: Vec<CallSiteFact>,
    pub styles: Vec<StyleFact>,
    pub inline_style_count: usize,
    pub security: Vec<SecurityConcern>,
    /// Imported names that appear as JSX usage tags in this file. Feeds the
    /// declaration hierarchy derivation.
    pub used_tags: BTreeSet<String>,
    /// Pre-rendered plain-text summary. Its length is the reportable-line
    /// unit the run coordinator budgets on.
    pub summary_lines: Vec<String>,
}

impl FileBundle {
    pub fn new(rel_path: impl Into<String>) -> Self {
        Self {
            rel_path: rel_path.into(),
            ..Default::default()
        }
    }

    /// True when the file produced nothing worth reporting.
    pub fn is_empty(&self) -> bool {
        self.summary_lines.is_empty()
    }
}

/// Stable fact id: md5 over `file:name:line`, hex encoded.
pub fn fact_id(file_path: &str, name: &str, line: u32) -> String {
    let input = format!("{}:{}:{}", file_path, name, line);
    let digest = md5::compute(input.as_bytes());
    format!("{:x}", digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fact_id_is_stable_and_position_sensitive() {
        let a = fact_id("src/App.tsx", "App", 3);
        let b = fact_id("src/App.tsx", "App", 3);
        let c = fact_id("src/App.tsx", "App", 4);
        assert_eq!(a, b, "same inputs must hash identically");
        assert_ne!(a, c, "line must participate in the id");
        assert_eq!(a.len(), 32, "md5 hex digest is 32 chars");
    }

    #[test]
    fn table_name_display_marks_unresolved_variables() {
        assert_eq!(TableName::Literal("Users".into()).to_string(), "Users");
        assert_eq!(
            TableName::Variable("USERS_DATABASE_NAME".into()).to_string(),
            "USERS_DATABASE_NAME (variable)"
        );
    }

    #[test]
    fn param_info_defaults_missing_type_to_any() {
        let p = ParamInfo::new("count", None);
        assert_eq!(p.ty, "any");
        let q = ParamInfo::new("count", Some("number"));
        assert_eq!(q.ty, "number");
    }
}
