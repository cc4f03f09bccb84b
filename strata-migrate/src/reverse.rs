//! Down-SQL synthesis.
//!
//! Given a forward action list and a snapshot of the pre-change state, emit
//! the best-effort reverse list: the forward list reversed, each action
//! replaced by its inverse. Where the inverse is unknowable (dropped
//! objects, missing snapshot entries) a `-- WARNING:` comment line is
//! emitted instead, keeping the reverse script syntactically valid SQL
//! while flagging the lines that need a human.

use std::collections::HashMap;

use strata_schema::Namespace;

use crate::action::Action;

/// Snapshot of the pre-change state, keyed by fully qualified identifiers:
/// `<ns>.<tbl>.<col>` for columns, `<ns>.<seq>` for sequences.
#[derive(Debug, Clone, Default)]
pub struct ExistingState {
    column_types: HashMap<String, String>,
    column_defaults: HashMap<String, String>,
    column_nullable: HashMap<String, bool>,
    sequence_kinds: HashMap<String, String>,
}

impl ExistingState {
    /// An empty snapshot. Reversals that need history will emit warnings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the introspected namespaces before diffing.
    pub fn from_namespaces(namespaces: &[Namespace]) -> Self {
        let mut state = Self::default();
        for ns in namespaces {
            for table in &ns.tables {
                for column in &table.columns {
                    let key = format!("{}.{}.{}", ns.name, table.name, column.name);
                    state.column_types.insert(key.clone(), column.type_sql());
                    if let Some(default) = &column.default
                        && !default.is_empty()
                    {
                        state.column_defaults.insert(key.clone(), default.clone());
                    }
                    state.column_nullable.insert(key, column.nullable);
                }
            }
            for sequence in &ns.sequences {
                state
                    .sequence_kinds
                    .insert(format!("{}.{}", ns.name, sequence.name), sequence.kind.to_string());
            }
        }
        state
    }

    fn column_type(&self, table: &str, column: &str) -> Option<&str> {
        self.column_types
            .get(&format!("{table}.{column}"))
            .map(String::as_str)
    }

    fn column_default(&self, table: &str, column: &str) -> Option<&str> {
        self.column_defaults
            .get(&format!("{table}.{column}"))
            .map(String::as_str)
    }

    fn sequence_kind(&self, sequence: &str) -> Option<&str> {
        self.sequence_kinds.get(sequence).map(String::as_str)
    }
}

/// Reverse a forward action list.
///
/// The output has exactly one line per input action, in reversed order.
pub fn reverse_actions(actions: &[Action], state: &ExistingState) -> Vec<String> {
    actions
        .iter()
        .rev()
        .map(|action| reverse_action(action, state))
        .collect()
}

/// Reverse hand-written forward SQL, one statement per line.
///
/// Statements outside the engine's vocabulary produce an unknown-action
/// warning line.
pub fn reverse_sql(up_sql: &str, state: &ExistingState) -> Vec<String> {
    let statements: Vec<&str> = up_sql
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    statements
        .iter()
        .rev()
        .map(|statement| match Action::parse(statement) {
            Some(action) => reverse_action(&action, state),
            None => format!("-- WARNING: Cannot reverse unknown action: {statement}"),
        })
        .collect()
}

fn reverse_action(action: &Action, state: &ExistingState) -> String {
    match action {
        Action::CreateSchema { namespace } => Action::DropSchema {
            namespace: namespace.clone(),
        }
        .to_string(),
        Action::DropSchema { namespace } => format!(
            "-- WARNING: Cannot automatically reverse DROP SCHEMA {namespace}. \
             Manual intervention required."
        ),
        Action::CreateTable { table } => Action::DropTable {
            table: table.clone(),
        }
        .to_string(),
        Action::DropTable { table } => format!(
            "-- WARNING: Cannot automatically reverse DROP TABLE {table}. \
             Manual intervention required."
        ),
        Action::AddColumn { table, column, .. } => Action::DropColumn {
            table: table.clone(),
            column: column.clone(),
        }
        .to_string(),
        Action::DropColumn { table, column } => format!(
            "-- WARNING: Cannot automatically reverse DROP COLUMN {column} on {table}. \
             Manual intervention required."
        ),
        Action::AlterColumnType { table, column, .. } => {
            match state.column_type(table, column) {
                Some(old_type) => Action::AlterColumnType {
                    table: table.clone(),
                    column: column.clone(),
                    data_type: old_type.to_string(),
                }
                .to_string(),
                None => format!(
                    "-- WARNING: Cannot determine original type for column {column} on {table}. \
                     Manual intervention required."
                ),
            }
        }
        Action::SetDefault { table, column, .. } => match state.column_default(table, column) {
            Some(old_default) => Action::SetDefault {
                table: table.clone(),
                column: column.clone(),
                expr: old_default.to_string(),
            }
            .to_string(),
            None => Action::DropDefault {
                table: table.clone(),
                column: column.clone(),
            }
            .to_string(),
        },
        Action::DropDefault { table, column } => match state.column_default(table, column) {
            Some(old_default) => Action::SetDefault {
                table: table.clone(),
                column: column.clone(),
                expr: old_default.to_string(),
            }
            .to_string(),
            None => format!(
                "-- WARNING: Cannot determine original default for column {column} on {table}. \
                 Manual intervention required."
            ),
        },
        Action::SetNotNull { table, column } => Action::DropNotNull {
            table: table.clone(),
            column: column.clone(),
        }
        .to_string(),
        Action::DropNotNull { table, column } => Action::SetNotNull {
            table: table.clone(),
            column: column.clone(),
        }
        .to_string(),
        Action::AddConstraint { table, name, .. } => Action::DropConstraint {
            table: table.clone(),
            name: name.clone(),
        }
        .to_string(),
        Action::DropConstraint { table, name } => format!(
            "-- WARNING: Cannot automatically reverse DROP CONSTRAINT {name} on {table}. \
             Manual intervention required."
        ),
        Action::CreateIndex { name, .. } => Action::DropIndex {
            index: name.clone(),
        }
        .to_string(),
        Action::DropIndex { index } => format!(
            "-- WARNING: Cannot automatically reverse DROP INDEX {index}. \
             Manual intervention required."
        ),
        Action::CreateSequence { sequence, .. } => Action::DropSequence {
            sequence: sequence.clone(),
        }
        .to_string(),
        Action::DropSequence { sequence } => match state.sequence_kind(sequence) {
            Some(kind) => Action::CreateSequence {
                sequence: sequence.clone(),
                kind: Some(kind.to_string()),
            }
            .to_string(),
            None => format!(
                "-- WARNING: Cannot automatically reverse DROP SEQUENCE {sequence}. \
                 Manual intervention required."
            ),
        },
        Action::AlterSequence { sequence, .. } => match state.sequence_kind(sequence) {
            Some(kind) => Action::AlterSequence {
                sequence: sequence.clone(),
                kind: kind.to_string(),
            }
            .to_string(),
            None => format!(
                "-- WARNING: Cannot determine original type for sequence {sequence}. \
                 Manual intervention required."
            ),
        },
    }
}
