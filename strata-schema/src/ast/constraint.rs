//! Table constraints.

use serde::{Deserialize, Serialize};

/// Constraint kinds, as reported by the server's `contype` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintKind {
    #[serde(rename = "PRIMARY KEY")]
    PrimaryKey,
    #[serde(rename = "UNIQUE")]
    Unique,
    #[serde(rename = "FOREIGN KEY")]
    ForeignKey,
    #[serde(rename = "CHECK")]
    Check,
}

impl ConstraintKind {
    /// Map a `pg_constraint.contype` code to a kind.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'p' => Some(Self::PrimaryKey),
            'u' => Some(Self::Unique),
            'f' => Some(Self::ForeignKey),
            'c' => Some(Self::Check),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PrimaryKey => "PRIMARY KEY",
            Self::Unique => "UNIQUE",
            Self::ForeignKey => "FOREIGN KEY",
            Self::Check => "CHECK",
        };
        write!(f, "{s}")
    }
}

/// Referential actions for foreign keys, as reported by the server's
/// `confupdtype` / `confdeltype` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    #[serde(rename = "SET NULL")]
    SetNull,
    #[serde(rename = "SET DEFAULT")]
    SetDefault,
    #[serde(rename = "CASCADE")]
    Cascade,
    #[serde(rename = "RESTRICT")]
    Restrict,
    #[serde(rename = "NO ACTION")]
    NoAction,
}

impl ReferentialAction {
    /// Map a `pg_constraint` action code to an action.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'a' => Some(Self::NoAction),
            'c' => Some(Self::Cascade),
            'r' => Some(Self::Restrict),
            'n' => Some(Self::SetNull),
            'd' => Some(Self::SetDefault),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        };
        write!(f, "{s}")
    }
}

/// The referenced side of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Referenced table.
    pub table: String,
    /// Referenced columns, order-sensitive.
    pub columns: Vec<String>,
}

/// A table constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint name. Not part of structural equality.
    pub name: String,
    /// Constraint kind.
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    /// Constrained columns, order-sensitive.
    pub targets: Vec<String>,
    /// Referenced table and columns. Required for foreign keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    /// ON DELETE action, foreign keys only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,
    /// ON UPDATE action, foreign keys only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferentialAction>,
}

impl Constraint {
    /// Structural equality, ignoring the name.
    ///
    /// Same kind and same ordered target list; foreign keys additionally
    /// compare the reference and both referential actions.
    pub fn equivalent(&self, other: &Constraint) -> bool {
        if self.kind != other.kind || self.targets != other.targets {
            return false;
        }
        match self.kind {
            ConstraintKind::ForeignKey => {
                self.reference == other.reference
                    && self.on_delete == other.on_delete
                    && self.on_update == other.on_update
            }
            _ => true,
        }
    }

    /// The constraint clause as used in `ALTER TABLE ... ADD <clause>`:
    /// `CONSTRAINT <name> <kind> (<targets>)` plus, for foreign keys, the
    /// `REFERENCES` clause and any referential actions.
    pub fn sql(&self) -> String {
        let mut sql = format!(
            "CONSTRAINT {} {} ({})",
            self.name,
            self.kind,
            self.targets.join(", ")
        );
        if self.kind == ConstraintKind::ForeignKey
            && let Some(reference) = &self.reference
        {
            sql.push_str(&format!(
                " REFERENCES {} ({})",
                reference.table,
                reference.columns.join(", ")
            ));
            if let Some(action) = self.on_delete {
                sql.push_str(&format!(" ON DELETE {action}"));
            }
            if let Some(action) = self.on_update {
                sql.push_str(&format!(" ON UPDATE {action}"));
            }
        }
        sql
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_on(name: &str, targets: &[&str]) -> Constraint {
        Constraint {
            name: name.to_string(),
            kind: ConstraintKind::Unique,
            targets: targets.iter().map(|s| s.to_string()).collect(),
            reference: None,
            on_delete: None,
            on_update: None,
        }
    }

    fn fk(name: &str, on_delete: ReferentialAction) -> Constraint {
        Constraint {
            name: name.to_string(),
            kind: ConstraintKind::ForeignKey,
            targets: vec!["author_id".to_string()],
            reference: Some(Reference {
                table: "users".to_string(),
                columns: vec!["id".to_string()],
            }),
            on_delete: Some(on_delete),
            on_update: Some(ReferentialAction::NoAction),
        }
    }

    #[test]
    fn kind_codes_round_trip() {
        assert_eq!(ConstraintKind::from_code('p'), Some(ConstraintKind::PrimaryKey));
        assert_eq!(ConstraintKind::from_code('u'), Some(ConstraintKind::Unique));
        assert_eq!(ConstraintKind::from_code('f'), Some(ConstraintKind::ForeignKey));
        assert_eq!(ConstraintKind::from_code('c'), Some(ConstraintKind::Check));
        assert_eq!(ConstraintKind::from_code('x'), None);
    }

    #[test]
    fn action_codes_round_trip() {
        assert_eq!(ReferentialAction::from_code('a'), Some(ReferentialAction::NoAction));
        assert_eq!(ReferentialAction::from_code('c'), Some(ReferentialAction::Cascade));
        assert_eq!(ReferentialAction::from_code('r'), Some(ReferentialAction::Restrict));
        assert_eq!(ReferentialAction::from_code('n'), Some(ReferentialAction::SetNull));
        assert_eq!(ReferentialAction::from_code('d'), Some(ReferentialAction::SetDefault));
        assert_eq!(ReferentialAction::from_code('?'), None);
    }

    #[test]
    fn equality_ignores_name() {
        let a = unique_on("users_email_key", &["email"]);
        let b = unique_on("users_email_unique", &["email"]);
        assert!(a.equivalent(&b));
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a = unique_on("k", &["a", "b"]);
        let b = unique_on("k", &["b", "a"]);
        assert!(!a.equivalent(&b));
    }

    #[test]
    fn foreign_key_equality_compares_actions() {
        let a = fk("posts_author_fk", ReferentialAction::Cascade);
        let b = fk("posts_author_fk", ReferentialAction::SetNull);
        assert!(!a.equivalent(&b));
    }

    #[test]
    fn renders_simple_constraint() {
        let c = unique_on("users_email_unique", &["email"]);
        assert_eq!(c.sql(), "CONSTRAINT users_email_unique UNIQUE (email)");
    }

    #[test]
    fn renders_foreign_key_clause() {
        let c = fk("posts_author_fk", ReferentialAction::Cascade);
        assert_eq!(
            c.sql(),
            "CONSTRAINT posts_author_fk FOREIGN KEY (author_id) \
             REFERENCES users (id) ON DELETE CASCADE ON UPDATE NO ACTION"
        );
    }
}
