//! Parameterized SQL for the relational backend.
//!
//! Statements are assembled from structured field/value pairs; every value is
//! bound as a numbered parameter, never spliced into the SQL text.

use super::{FieldValues, PropertyFilter};
use crate::types::{Field, PropertyRecord};

pub const TABLE: &str = "properties";

/// SQL text plus its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<String>,
}

impl Statement {
    fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Bind a value and return its placeholder.
    fn bind(&mut self, value: impl Into<String>) -> String {
        self.params.push(value.into());
        format!("?{}", self.params.len())
    }

    fn push_where(&mut self, filter: &PropertyFilter) {
        let mut clauses = Vec::new();
        for (field, value) in filter.equalities() {
            let placeholder = self.bind(value);
            clauses.push(format!("{} = {}", quote(field), placeholder));
        }
        if let Some(keys) = filter.keys() {
            let placeholders: Vec<String> = keys.iter().map(|k| self.bind(k.as_str())).collect();
            clauses.push(format!("{} IN ({})", quote(Field::Key), placeholders.join(", ")));
        }
        if !clauses.is_empty() {
            self.sql.push_str(" WHERE ");
            self.sql.push_str(&clauses.join(" AND "));
        }
    }
}

fn quote(field: Field) -> String {
    format!("\"{}\"", field.column())
}

fn column_list() -> String {
    Field::ALL
        .iter()
        .map(|f| quote(*f))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Idempotent schema: every column is text.
pub fn create_table() -> String {
    let columns: Vec<String> = Field::ALL
        .iter()
        .map(|f| format!("    {} TEXT", quote(*f)))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n);",
        TABLE,
        columns.join(",\n")
    )
}

/// Insert statement for one record; reusable for a batch via its SQL text.
pub fn insert(record: &PropertyRecord) -> Statement {
    let mut stmt = Statement::new(format!("INSERT INTO {} ({}) VALUES (", TABLE, column_list()));
    let placeholders: Vec<String> = Field::ALL
        .iter()
        .map(|f| stmt.bind(record.get(*f)))
        .collect();
    stmt.sql.push_str(&placeholders.join(", "));
    stmt.sql.push(')');
    stmt
}

pub fn select(filter: &PropertyFilter) -> Statement {
    let mut stmt = Statement::new(format!("SELECT {} FROM {}", column_list(), TABLE));
    stmt.push_where(filter);
    stmt
}

/// `None` when there is nothing to update.
pub fn update(updated: &FieldValues, filter: &PropertyFilter) -> Option<Statement> {
    if updated.is_empty() {
        return None;
    }
    let mut stmt = Statement::new(format!("UPDATE {} SET ", TABLE));
    let assignments: Vec<String> = updated
        .iter()
        .map(|(field, value)| format!("{} = {}", quote(*field), stmt.bind(value.as_str())))
        .collect();
    stmt.sql.push_str(&assignments.join(", "));
    stmt.push_where(filter);
    Some(stmt)
}

pub fn delete(filter: &PropertyFilter) -> Statement {
    let mut stmt = Statement::new(format!("DELETE FROM {}", TABLE));
    stmt.push_where(filter);
    stmt
}

pub fn count() -> Statement {
    Statement::new(format!("SELECT COUNT(*) FROM {}", TABLE))
}
