//! Column definitions.

use serde::{Deserialize, Serialize};

use super::is_false;

/// A table column.
///
/// Columns are declaration-ordered within their table, but the diff engine
/// matches them by name, never by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Canonical uppercase type name, e.g. `INTEGER` or `CHARACTER VARYING`.
    #[serde(rename = "type")]
    pub data_type: String,
    /// Maximum length. Required for and only for `CHARACTER VARYING`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Whether NULL values are allowed.
    pub nullable: bool,
    /// Default expression, without any trailing cast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Whether this column is part of the primary key.
    #[serde(default, skip_serializing_if = "is_false")]
    pub primary_key: bool,
}

impl Column {
    /// Whether the type requires a max length.
    pub fn is_varying(&self) -> bool {
        self.data_type.eq_ignore_ascii_case("CHARACTER VARYING")
    }

    /// The type as rendered in DDL, with the length suffix when present.
    ///
    /// Because the length rides on the type string, a max-length change
    /// surfaces to the diff engine as a plain type change.
    pub fn type_sql(&self) -> String {
        match self.max_length {
            Some(len) => format!("{}({})", self.data_type, len),
            None => self.data_type.clone(),
        }
    }

    /// The full column clause embedded verbatim in `ADD COLUMN`:
    /// `<name> <type>[(<maxLength>)] <NOT NULL|NULL> [DEFAULT <expr>]`.
    pub fn sql(&self) -> String {
        let mut parts = vec![self.name.clone(), self.type_sql()];
        parts.push(if self.nullable { "NULL" } else { "NOT NULL" }.to_string());
        if let Some(default) = &self.default {
            parts.push(format!("DEFAULT {default}"));
        }
        parts.join(" ")
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, data_type: &str) -> Column {
        Column {
            name: name.to_string(),
            data_type: data_type.to_string(),
            max_length: None,
            nullable: true,
            default: None,
            primary_key: false,
        }
    }

    #[test]
    fn renders_nullable_column() {
        assert_eq!(column("bio", "TEXT").sql(), "bio TEXT NULL");
    }

    #[test]
    fn renders_not_null_with_default() {
        let mut col = column("id", "INTEGER");
        col.nullable = false;
        col.default = Some("nextval('users_id_seq')".to_string());
        assert_eq!(
            col.sql(),
            "id INTEGER NOT NULL DEFAULT nextval('users_id_seq')"
        );
    }

    #[test]
    fn renders_length_on_type() {
        let mut col = column("email", "CHARACTER VARYING");
        col.max_length = Some(255);
        assert_eq!(col.sql(), "email CHARACTER VARYING(255) NULL");
        assert_eq!(col.type_sql(), "CHARACTER VARYING(255)");
    }

    #[test]
    fn varying_detection_is_case_insensitive() {
        assert!(column("a", "character varying").is_varying());
        assert!(!column("a", "TEXT").is_varying());
    }
}
