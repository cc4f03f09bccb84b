//! The DDL action vocabulary.
//!
//! The diff engine and the down synthesizer exchange actions as a tagged
//! union rather than raw strings: the string form is one rendering
//! (`Display`), and the regex layer exists only to consume hand-written
//! forward SQL (`Action::parse`).
//!
//! Qualified names are carried as-is: a table is `<namespace>.<table>`, an
//! index or sequence reference is `<namespace>.<name>`. Parsing keeps
//! whatever qualification the input used.

use std::sync::LazyLock;

use regex_lite::Regex;
use strata_schema::{Column, Constraint, Index};

/// A single DDL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateSchema {
        namespace: String,
    },
    DropSchema {
        namespace: String,
    },
    CreateTable {
        table: String,
    },
    DropTable {
        table: String,
    },
    AddColumn {
        table: String,
        column: String,
        /// The full column clause, starting with the column name.
        definition: String,
    },
    DropColumn {
        table: String,
        column: String,
    },
    AlterColumnType {
        table: String,
        column: String,
        data_type: String,
    },
    SetDefault {
        table: String,
        column: String,
        expr: String,
    },
    DropDefault {
        table: String,
        column: String,
    },
    SetNotNull {
        table: String,
        column: String,
    },
    DropNotNull {
        table: String,
        column: String,
    },
    AddConstraint {
        table: String,
        name: String,
        /// The full constraint clause, starting with `CONSTRAINT <name>`.
        clause: String,
    },
    DropConstraint {
        table: String,
        name: String,
    },
    CreateIndex {
        name: String,
        table: String,
        unique: bool,
        algorithm: String,
        columns: Vec<String>,
    },
    DropIndex {
        index: String,
    },
    CreateSequence {
        sequence: String,
        /// Value type, when restoring a dropped sequence.
        kind: Option<String>,
    },
    DropSequence {
        sequence: String,
    },
    AlterSequence {
        sequence: String,
        kind: String,
    },
}

impl Action {
    /// `ALTER TABLE ... ADD COLUMN` with the column clause rendered by the
    /// schema model.
    pub fn add_column(table: impl Into<String>, column: &Column) -> Self {
        Self::AddColumn {
            table: table.into(),
            column: column.name.clone(),
            definition: column.sql(),
        }
    }

    /// `ALTER TABLE ... ADD CONSTRAINT` with the clause rendered by the
    /// schema model.
    pub fn add_constraint(table: impl Into<String>, constraint: &Constraint) -> Self {
        Self::AddConstraint {
            table: table.into(),
            name: constraint.name.clone(),
            clause: constraint.sql(),
        }
    }

    /// `CREATE [UNIQUE ]INDEX ... USING ...` for an index on a table.
    pub fn create_index(table: impl Into<String>, index: &Index) -> Self {
        Self::CreateIndex {
            name: index.name.clone(),
            table: table.into(),
            unique: index.unique,
            algorithm: index.algorithm.clone(),
            columns: index.columns.clone(),
        }
    }

    /// Parse a single hand-written DDL statement into the vocabulary.
    ///
    /// Returns `None` for anything outside the closed vocabulary; the down
    /// synthesizer turns that into an unknown-action warning.
    pub fn parse(statement: &str) -> Option<Action> {
        let statement = statement.trim();

        if let Some(m) = RE_CREATE_SCHEMA.captures(statement) {
            return Some(Action::CreateSchema {
                namespace: m[1].to_string(),
            });
        }
        if let Some(m) = RE_DROP_SCHEMA.captures(statement) {
            return Some(Action::DropSchema {
                namespace: m[1].to_string(),
            });
        }
        if let Some(m) = RE_CREATE_TABLE.captures(statement) {
            return Some(Action::CreateTable {
                table: m[1].to_string(),
            });
        }
        if let Some(m) = RE_DROP_TABLE.captures(statement) {
            return Some(Action::DropTable {
                table: m[1].to_string(),
            });
        }
        if let Some(m) = RE_ADD_CONSTRAINT.captures(statement) {
            return Some(Action::AddConstraint {
                table: m[1].to_string(),
                name: m[3].to_string(),
                clause: m[2].to_string(),
            });
        }
        if let Some(m) = RE_DROP_CONSTRAINT.captures(statement) {
            return Some(Action::DropConstraint {
                table: m[1].to_string(),
                name: m[2].to_string(),
            });
        }
        if let Some(m) = RE_ADD_COLUMN.captures(statement) {
            return Some(Action::AddColumn {
                table: m[1].to_string(),
                column: m[2].to_string(),
                definition: format!("{} {}", &m[2], &m[3]),
            });
        }
        if let Some(m) = RE_DROP_COLUMN.captures(statement) {
            return Some(Action::DropColumn {
                table: m[1].to_string(),
                column: m[2].to_string(),
            });
        }
        if let Some(m) = RE_ALTER_COLUMN_TYPE.captures(statement) {
            return Some(Action::AlterColumnType {
                table: m[1].to_string(),
                column: m[2].to_string(),
                data_type: m[3].to_string(),
            });
        }
        if let Some(m) = RE_SET_DEFAULT.captures(statement) {
            return Some(Action::SetDefault {
                table: m[1].to_string(),
                column: m[2].to_string(),
                expr: m[3].to_string(),
            });
        }
        if let Some(m) = RE_DROP_DEFAULT.captures(statement) {
            return Some(Action::DropDefault {
                table: m[1].to_string(),
                column: m[2].to_string(),
            });
        }
        if let Some(m) = RE_SET_NOT_NULL.captures(statement) {
            return Some(Action::SetNotNull {
                table: m[1].to_string(),
                column: m[2].to_string(),
            });
        }
        if let Some(m) = RE_DROP_NOT_NULL.captures(statement) {
            return Some(Action::DropNotNull {
                table: m[1].to_string(),
                column: m[2].to_string(),
            });
        }
        if let Some(m) = RE_CREATE_INDEX.captures(statement) {
            return Some(Action::CreateIndex {
                unique: m.get(1).is_some(),
                name: m[2].to_string(),
                table: m[3].to_string(),
                algorithm: m[4].to_string(),
                columns: m[5].split(", ").map(str::to_string).collect(),
            });
        }
        if let Some(m) = RE_DROP_INDEX.captures(statement) {
            return Some(Action::DropIndex {
                index: m[1].to_string(),
            });
        }
        if let Some(m) = RE_CREATE_SEQUENCE.captures(statement) {
            return Some(Action::CreateSequence {
                sequence: m[1].to_string(),
                kind: m.get(2).map(|k| k.as_str().to_string()),
            });
        }
        if let Some(m) = RE_DROP_SEQUENCE.captures(statement) {
            return Some(Action::DropSequence {
                sequence: m[1].to_string(),
            });
        }
        if let Some(m) = RE_ALTER_SEQUENCE.captures(statement) {
            return Some(Action::AlterSequence {
                sequence: m[1].to_string(),
                kind: m[2].to_string(),
            });
        }

        None
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::CreateSchema { namespace } => write!(f, "CREATE SCHEMA {namespace};"),
            Action::DropSchema { namespace } => write!(f, "DROP SCHEMA {namespace} CASCADE;"),
            Action::CreateTable { table } => write!(f, "CREATE TABLE {table} ();"),
            Action::DropTable { table } => write!(f, "DROP TABLE {table};"),
            Action::AddColumn {
                table, definition, ..
            } => write!(f, "ALTER TABLE {table} ADD COLUMN {definition};"),
            Action::DropColumn { table, column } => {
                write!(f, "ALTER TABLE {table} DROP COLUMN {column};")
            }
            Action::AlterColumnType {
                table,
                column,
                data_type,
            } => write!(f, "ALTER TABLE {table} ALTER COLUMN {column} TYPE {data_type};"),
            Action::SetDefault {
                table,
                column,
                expr,
            } => write!(f, "ALTER TABLE {table} ALTER COLUMN {column} SET DEFAULT {expr};"),
            Action::DropDefault { table, column } => {
                write!(f, "ALTER TABLE {table} ALTER COLUMN {column} DROP DEFAULT;")
            }
            Action::SetNotNull { table, column } => {
                write!(f, "ALTER TABLE {table} ALTER COLUMN {column} SET NOT NULL;")
            }
            Action::DropNotNull { table, column } => {
                write!(f, "ALTER TABLE {table} ALTER COLUMN {column} DROP NOT NULL;")
            }
            Action::AddConstraint { table, clause, .. } => {
                write!(f, "ALTER TABLE {table} ADD {clause};")
            }
            Action::DropConstraint { table, name } => {
                write!(f, "ALTER TABLE {table} DROP CONSTRAINT {name};")
            }
            Action::CreateIndex {
                name,
                table,
                unique,
                algorithm,
                columns,
            } => {
                let unique = if *unique { "UNIQUE " } else { "" };
                write!(
                    f,
                    "CREATE {unique}INDEX {name} ON {table} USING {algorithm} ({});",
                    columns.join(", ")
                )
            }
            Action::DropIndex { index } => write!(f, "DROP INDEX {index};"),
            Action::CreateSequence { sequence, kind } => match kind {
                Some(kind) => write!(f, "CREATE SEQUENCE {sequence} AS {kind};"),
                None => write!(f, "CREATE SEQUENCE {sequence};"),
            },
            Action::DropSequence { sequence } => write!(f, "DROP SEQUENCE {sequence};"),
            Action::AlterSequence { sequence, kind } => {
                write!(f, "ALTER SEQUENCE {sequence} AS {kind};")
            }
        }
    }
}

macro_rules! action_regex {
    ($name:ident, $pattern:literal) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("action regex"));
    };
}

action_regex!(RE_CREATE_SCHEMA, r"(?i)^CREATE SCHEMA (\S+?);?$");
action_regex!(RE_DROP_SCHEMA, r"(?i)^DROP SCHEMA (\S+?)(?: CASCADE)?;?$");
action_regex!(RE_CREATE_TABLE, r"(?i)^CREATE TABLE (\S+)\s*\(.*\);?$");
action_regex!(RE_DROP_TABLE, r"(?i)^DROP TABLE (\S+?);?$");
action_regex!(RE_ADD_COLUMN, r"(?i)^ALTER TABLE (\S+) ADD COLUMN (\S+) (.+?);?$");
action_regex!(RE_DROP_COLUMN, r"(?i)^ALTER TABLE (\S+) DROP COLUMN (\S+?);?$");
action_regex!(
    RE_ALTER_COLUMN_TYPE,
    r"(?i)^ALTER TABLE (\S+) ALTER COLUMN (\S+) TYPE (.+?);?$"
);
action_regex!(
    RE_SET_DEFAULT,
    r"(?i)^ALTER TABLE (\S+) ALTER COLUMN (\S+) SET DEFAULT (.+?);?$"
);
action_regex!(
    RE_DROP_DEFAULT,
    r"(?i)^ALTER TABLE (\S+) ALTER COLUMN (\S+) DROP DEFAULT;?$"
);
action_regex!(
    RE_SET_NOT_NULL,
    r"(?i)^ALTER TABLE (\S+) ALTER COLUMN (\S+) SET NOT NULL;?$"
);
action_regex!(
    RE_DROP_NOT_NULL,
    r"(?i)^ALTER TABLE (\S+) ALTER COLUMN (\S+) DROP NOT NULL;?$"
);
action_regex!(
    RE_ADD_CONSTRAINT,
    r"(?i)^ALTER TABLE (\S+) ADD (CONSTRAINT (\S+) .+?);?$"
);
action_regex!(
    RE_DROP_CONSTRAINT,
    r"(?i)^ALTER TABLE (\S+) DROP CONSTRAINT (\S+?);?$"
);
action_regex!(
    RE_CREATE_INDEX,
    r"(?i)^CREATE (UNIQUE )?INDEX (\S+) ON (\S+) USING (\S+) \((.+)\);?$"
);
action_regex!(RE_DROP_INDEX, r"(?i)^DROP INDEX (\S+?);?$");
action_regex!(
    RE_CREATE_SEQUENCE,
    r"(?i)^CREATE SEQUENCE (\S+?)(?: AS (\S+?))?;?$"
);
action_regex!(RE_DROP_SEQUENCE, r"(?i)^DROP SEQUENCE (\S+?);?$");
action_regex!(RE_ALTER_SEQUENCE, r"(?i)^ALTER SEQUENCE (\S+) AS (\S+?);?$");
