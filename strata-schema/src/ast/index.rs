//! Table indices.

use serde::{Deserialize, Serialize};

use super::is_false;

fn default_algorithm() -> String {
    "btree".to_string()
}

fn is_default_algorithm(algorithm: &str) -> bool {
    algorithm == "btree"
}

/// A secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name. Not part of structural equality.
    pub name: String,
    /// Whether the index enforces uniqueness.
    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,
    /// Index access method, e.g. `btree` or `hash`.
    #[serde(
        default = "default_algorithm",
        skip_serializing_if = "is_default_algorithm"
    )]
    pub algorithm: String,
    /// Indexed columns, order-sensitive.
    pub columns: Vec<String>,
}

impl Index {
    /// Structural equality, ignoring the name.
    pub fn equivalent(&self, other: &Index) -> bool {
        self.unique == other.unique
            && self.algorithm == other.algorithm
            && self.columns == other.columns
    }
}

impl std::fmt::Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.unique {
            write!(f, "{} (UNIQUE) ON {}", self.name, self.columns.join(", "))
        } else {
            write!(f, "{} ON {}", self.name, self.columns.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(name: &str, unique: bool, columns: &[&str]) -> Index {
        Index {
            name: name.to_string(),
            unique,
            algorithm: "btree".to_string(),
            columns: columns.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn equality_ignores_name() {
        let a = index("idx_a", true, &["email"]);
        let b = index("idx_b", true, &["email"]);
        assert!(a.equivalent(&b));
    }

    #[test]
    fn equality_compares_uniqueness_and_columns() {
        let a = index("idx", true, &["email"]);
        assert!(!a.equivalent(&index("idx", false, &["email"])));
        assert!(!a.equivalent(&index("idx", true, &["email", "name"])));
    }

    #[test]
    fn equality_compares_algorithm() {
        let a = index("idx", false, &["email"]);
        let mut b = index("idx", false, &["email"]);
        b.algorithm = "hash".to_string();
        assert!(!a.equivalent(&b));
    }
}
