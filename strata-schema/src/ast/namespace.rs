//! Namespaces, sequences, and the database root.

use serde::{Deserialize, Serialize};

use super::Table;

/// Sequence value types supported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceKind {
    #[serde(rename = "bigint")]
    BigInt,
    #[serde(rename = "integer")]
    Integer,
}

impl SequenceKind {
    /// Map a server-reported data type to a kind.
    pub fn from_sql_type(data_type: &str) -> Option<Self> {
        if data_type.eq_ignore_ascii_case("bigint") {
            Some(Self::BigInt)
        } else if data_type.eq_ignore_ascii_case("integer") {
            Some(Self::Integer)
        } else {
            None
        }
    }
}

impl std::fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BigInt => "bigint",
            Self::Integer => "integer",
        };
        write!(f, "{s}")
    }
}

/// A sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// Sequence name.
    pub name: String,
    /// Value type.
    #[serde(rename = "type")]
    pub kind: SequenceKind,
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// A namespace (schema): a named scope holding tables and sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Namespace name.
    pub name: String,
    /// Tables in the namespace.
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Sequences in the namespace.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sequences: Vec<Sequence>,
}

impl Namespace {
    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// A named database: the root of an introspected tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Database name.
    pub name: String,
    /// Namespaces in the database.
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
}
