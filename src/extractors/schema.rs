//! Persistence-schema recognizer.
//!
//! Works in stages: collect name constants that alias a literal string,
//! locate keyword-anchored table statements tolerating either a literal or
//! an interpolated `${NAME}` table name, split the body on top-level commas
//! only, classify each segment as a column or a named constraint, then
//! associate index statements by resolved table name. Interpolated names
//! that cannot be resolved are kept and surfaced with a variable marker
//! instead of being dropped.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::base::{ColumnDef, ForeignKeyDef, IndexDef, TableFact, TableName};

static DB_NAME_CONST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:const|let|var|export\s+const)\s+(\w+)_DATABASE_NAME\s*=\s*['"]([^'"]+)['"]"#)
        .expect("db name constant pattern")
});

static TABLE_STMT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:([`"\w]+)|\$\{([^}]+)\})\s*\(([^;]+)\)"#,
    )
    .expect("table statement pattern")
});

static INDEX_STMT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)CREATE\s+(?:UNIQUE\s+)?INDEX\s+(?:IF\s+NOT\s+EXISTS\s+)?(\w+)\s+ON\s+(?:([`"\w]+)|\$\{([^}]+)\})\s*\(([^)]+)\)"#,
    )
    .expect("index statement pattern")
});

static CONSTRAINT_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:CONSTRAINT|PRIMARY\s+KEY|FOREIGN\s+KEY|UNIQUE|CHECK)")
        .expect("constraint head pattern")
});

static PK_CONSTRAINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)PRIMARY\s+KEY\s*\(([^)]+)\)").expect("pk constraint pattern"));

static FK_CONSTRAINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)FOREIGN\s+KEY\s*\(([^)]+)\)\s*REFERENCES\s*([`"\w]+|\$\{[^}]+\})\s*\(([^)]+)\)"#,
    )
    .expect("fk constraint pattern")
});

static DEFAULT_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)DEFAULT\s+([^,\s]+)").expect("default value pattern"));

pub fn recognize(content: &str, file_path: &str) -> Vec<TableFact> {
    let names = collect_name_constants(content);
    let mut tables = Vec::new();

    for caps in TABLE_STMT.captures_iter(content) {
        let table = resolve_table_name(
            caps.get(1).map(|m| m.as_str()),
            caps.get(2).map(|m| m.as_str()),
            &names,
        );
        let body = caps.get(3).map(|m| m.as_str()).unwrap_or("").trim();

        let mut columns = Vec::new();
        let mut primary_keys = Vec::new();
        let mut foreign_keys = Vec::new();

        for segment in split_top_level(body) {
            if CONSTRAINT_HEAD.is_match(&segment) {
                apply_constraint(&segment, &names, &mut primary_keys, &mut foreign_keys);
            } else if let Some(column) = parse_column(&segment, &mut primary_keys) {
                columns.push(column);
            }
        }

        tables.push(TableFact {
            indices: indices_for(content, &table, &names),
            table,
            columns,
            primary_keys,
            foreign_keys,
            file_path: file_path.to_string(),
        });
    }

    tables
}

/// Constants aliasing a literal table name, stored under both the bare
/// prefix and the full constant name so either interpolation form resolves.
fn collect_name_constants(content: &str) -> BTreeMap<String, String> {
    let mut names = BTreeMap::new();
    for caps in DB_NAME_CONST.captures_iter(content) {
        let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let value = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        names.insert(prefix.to_string(), value.to_string());
        names.insert(format!("{prefix}_DATABASE_NAME"), value.to_string());
    }
    names
}

fn resolve_table_name(
    literal: Option<&str>,
    variable: Option<&str>,
    names: &BTreeMap<String, String>,
) -> TableName {
    if let Some(literal) = literal {
        return TableName::Literal(literal.trim_matches(['`', '"']).to_string());
    }
    let variable = variable.unwrap_or_default();
    match names.get(variable) {
        Some(resolved) => TableName::Literal(resolved.clone()),
        None => TableName::Variable(variable.to_string()),
    }
}

/// Split a table body on commas at parenthesis depth zero, so constraint
/// argument lists stay whole.
fn split_top_level(body: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for ch in body.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                let segment = current.trim();
                if !segment.is_empty() {
                    segments.push(segment.to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    let segment = current.trim();
    if !segment.is_empty() {
        segments.push(segment.to_string());
    }
    segments
}

fn apply_constraint(
    segment: &str,
    names: &BTreeMap<String, String>,
    primary_keys: &mut Vec<String>,
    foreign_keys: &mut Vec<ForeignKeyDef>,
) {
    if let Some(caps) = PK_CONSTRAINT.captures(segment) {
        for pk in caps.get(1).map(|m| m.as_str()).unwrap_or("").split(',') {
            primary_keys.push(pk.trim().trim_matches(['`', '"']).to_string());
        }
    }

    if let Some(caps) = FK_CONSTRAINT.captures(segment) {
        let columns: Vec<String> = caps
            .get(1)
            .map(|m| m.as_str())
            .unwrap_or("")
            .split(',')
            .map(|c| c.trim().trim_matches(['`', '"']).to_string())
            .collect();
        let ref_columns: Vec<String> = caps
            .get(3)
            .map(|m| m.as_str())
            .unwrap_or("")
            .split(',')
            .map(|c| c.trim().trim_matches(['`', '"']).to_string())
            .collect();

        let raw_ref = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        let ref_table = if let Some(variable) = raw_ref
            .strip_prefix("${")
            .and_then(|s| s.strip_suffix('}'))
        {
            match names.get(variable) {
                Some(resolved) => TableName::Literal(resolved.clone()),
                None => TableName::Variable(variable.to_string()),
            }
        } else {
            TableName::Literal(raw_ref.trim_matches(['`', '"']).to_string())
        };

        for (i, column) in columns.iter().enumerate() {
            // Mismatched lists reuse the last referenced column rather than
            // dropping the key.
            let ref_column = ref_columns
                .get(i)
                .or_else(|| ref_columns.last())
                .cloned()
                .unwrap_or_default();
            foreign_keys.push(ForeignKeyDef {
                column: column.clone(),
                ref_table: ref_table.clone(),
                ref_column,
            });
        }
    }
}

fn parse_column(segment: &str, primary_keys: &mut Vec<String>) -> Option<ColumnDef> {
    let mut parts = segment.split_whitespace();
    let name = parts.next()?.trim_matches(['`', '"']).to_string();
    // Base type without a size suffix.
    let ty = parts.next()?.split('(').next().unwrap_or("").to_string();

    let upper = segment.to_uppercase();
    let is_pk = upper.contains("PRIMARY KEY");
    if is_pk {
        primary_keys.push(name.clone());
    }

    Some(ColumnDef {
        name,
        ty,
        // A primary-key column is not nullable even without an explicit
        // NOT NULL.
        nullable: !upper.contains("NOT NULL") && !is_pk,
        default: DEFAULT_VALUE
            .captures(segment)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string()),
    })
}

fn indices_for(
    content: &str,
    table: &TableName,
    names: &BTreeMap<String, String>,
) -> Vec<IndexDef> {
    let mut indices = Vec::new();
    for caps in INDEX_STMT.captures_iter(content) {
        let target = resolve_table_name(
            caps.get(2).map(|m| m.as_str()),
            caps.get(3).map(|m| m.as_str()),
            names,
        );
        let matches_table = match (&target, table) {
            (TableName::Literal(a), TableName::Literal(b)) => a == b,
            (TableName::Variable(a), TableName::Variable(b)) => a == b,
            (TableName::Literal(a), TableName::Variable(b))
            | (TableName::Variable(a), TableName::Literal(b)) => a == b,
        };
        if !matches_table {
            continue;
        }
        indices.push(IndexDef {
            name: caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
            columns: caps
                .get(4)
                .map(|m| m.as_str())
                .unwrap_or("")
                .split(',')
                .map(|c| c.trim().trim_matches(['`', '"']).to_string())
                .collect(),
            unique: caps
                .get(0)
                .map(|m| m.as_str().to_uppercase().contains("UNIQUE"))
                .unwrap_or(false),
        });
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_round_trip_with_primary_and_foreign_key() {
        let sql = "CREATE TABLE IF NOT EXISTS Users (id TEXT PRIMARY KEY, orgId TEXT NOT NULL, FOREIGN KEY (orgId) REFERENCES Orgs(id))";
        let tables = recognize(sql, "src/db/schema.ts");
        assert_eq!(tables.len(), 1);
        let table = &tables[0];

        assert_eq!(table.table, TableName::Literal("Users".to_string()));
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].name, "id");
        assert_eq!(table.columns[0].ty, "TEXT");
        assert!(!table.columns[0].nullable, "primary key implies not null");
        assert_eq!(table.columns[1].name, "orgId");
        assert_eq!(table.columns[1].ty, "TEXT");
        assert!(!table.columns[1].nullable);

        assert_eq!(table.primary_keys, vec!["id"]);
        assert_eq!(table.foreign_keys.len(), 1);
        let fk = &table.foreign_keys[0];
        assert_eq!(fk.column, "orgId");
        assert_eq!(fk.ref_table, TableName::Literal("Orgs".to_string()));
        assert_eq!(fk.ref_column, "id");
    }

    #[test]
    fn interpolated_name_resolves_through_constant() {
        let source = r#"
const USERS_DATABASE_NAME = 'users';
db.exec(`CREATE TABLE IF NOT EXISTS ${USERS_DATABASE_NAME} (id TEXT PRIMARY KEY)`);
"#;
        let tables = recognize(source, "src/db/init.ts");
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].table, TableName::Literal("users".to_string()));
    }

    #[test]
    fn unresolved_interpolation_keeps_variable_marker() {
        let source = "CREATE TABLE ${MYSTERY} (id TEXT)";
        let tables = recognize(source, "src/db/init.ts");
        assert_eq!(tables[0].table, TableName::Variable("MYSTERY".to_string()));
        assert!(!tables[0].table.is_resolved());
        assert_eq!(format!("{}", tables[0].table), "MYSTERY (variable)");
    }

    #[test]
    fn commas_inside_constraint_arguments_do_not_split() {
        let sql = "CREATE TABLE Events (id TEXT, status TEXT CHECK (status IN ('open', 'closed')), PRIMARY KEY (id, status))";
        let tables = recognize(sql, "src/db/schema.ts");
        let table = &tables[0];
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[1].name, "status");
        assert_eq!(table.primary_keys, vec!["id", "status"]);
    }

    #[test]
    fn indices_attach_by_resolved_table_name() {
        let source = r#"
CREATE TABLE Orders (id TEXT PRIMARY KEY, userId TEXT);
CREATE UNIQUE INDEX idx_orders_user ON Orders (userId);
CREATE INDEX idx_other ON Payments (orderId);
"#;
        let tables = recognize(source, "src/db/schema.ts");
        let orders = tables
            .iter()
            .find(|t| t.table == TableName::Literal("Orders".to_string()))
            .unwrap();
        assert_eq!(orders.indices.len(), 1);
        assert_eq!(orders.indices[0].name, "idx_orders_user");
        assert_eq!(orders.indices[0].columns, vec!["userId"]);
        assert!(orders.indices[0].unique);
    }

    #[test]
    fn default_values_are_captured() {
        let sql = "CREATE TABLE Prefs (theme TEXT DEFAULT 'light', retries INTEGER DEFAULT 3)";
        let tables = recognize(sql, "src/db/schema.ts");
        let cols = &tables[0].columns;
        assert_eq!(cols[0].default.as_deref(), Some("'light'"));
        assert_eq!(cols[1].default.as_deref(), Some("3"));
    }
}
