//! Schema validation.
//!
//! Validation runs at document-load time, before diffing, and checks the
//! model invariants: identifier length limits, name uniqueness within a
//! scope, the max-length rule for `CHARACTER VARYING`, and the requirement
//! that a non-nullable column carries a default or the primary-key flag.

use std::collections::HashSet;

use crate::ast::{Column, Namespace, Sequence, Table, MAX_NAME_LEN};
use crate::error::ValidationError;

/// Validate a set of namespaces as a whole, including cross-namespace
/// name uniqueness.
pub fn validate_namespaces(namespaces: &[Namespace]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for ns in namespaces {
        if !seen.insert(ns.name.as_str()) {
            return Err(ValidationError::DuplicateNamespace(ns.name.clone()));
        }
        ns.validate()?;
    }
    Ok(())
}

impl Namespace {
    /// Validate this namespace and everything beneath it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::UnnamedNamespace);
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err(ValidationError::NamespaceNameTooLong(self.name.clone()));
        }

        let mut tables = HashSet::new();
        for table in &self.tables {
            if !tables.insert(table.name.as_str()) {
                return Err(ValidationError::DuplicateTable {
                    namespace: self.name.clone(),
                    table: table.name.clone(),
                });
            }
            table.validate(&self.name)?;
        }

        let mut sequences = HashSet::new();
        for sequence in &self.sequences {
            if !sequences.insert(sequence.name.as_str()) {
                return Err(ValidationError::DuplicateSequence {
                    namespace: self.name.clone(),
                    sequence: sequence.name.clone(),
                });
            }
            sequence.validate(&self.name)?;
        }

        Ok(())
    }
}

impl Table {
    fn validate(&self, namespace: &str) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::UnnamedTable {
                namespace: namespace.to_string(),
            });
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err(ValidationError::TableNameTooLong(self.name.clone()));
        }

        for column in &self.columns {
            column.validate(&self.name)?;
        }
        Ok(())
    }
}

impl Column {
    fn validate(&self, table: &str) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::UnnamedColumn {
                table: table.to_string(),
            });
        }
        if self.data_type.is_empty() {
            return Err(ValidationError::UntypedColumn {
                table: table.to_string(),
                column: self.name.clone(),
            });
        }
        if self.is_varying() && self.max_length.is_none_or(|l| l == 0) {
            return Err(ValidationError::MissingMaxLength {
                table: table.to_string(),
                column: self.name.clone(),
            });
        }
        if !self.is_varying() && self.max_length.is_some() {
            return Err(ValidationError::UnexpectedMaxLength {
                table: table.to_string(),
                column: self.name.clone(),
                data_type: self.data_type.clone(),
            });
        }
        let has_default = self.default.as_deref().is_some_and(|d| !d.is_empty());
        if !self.nullable && !has_default && !self.primary_key {
            return Err(ValidationError::NotNullWithoutDefault {
                table: table.to_string(),
                column: self.name.clone(),
            });
        }
        Ok(())
    }
}

impl Sequence {
    fn validate(&self, namespace: &str) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::UnnamedSequence {
                namespace: namespace.to_string(),
            });
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err(ValidationError::SequenceNameTooLong(self.name.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SequenceKind;

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

    fn namespace_with(columns: Vec<Column>) -> Namespace {
        Namespace {
            name: "public".to_string(),
            tables: vec![Table {
                name: "users".to_string(),
                columns,
                constraints: vec![],
                indices: vec![],
            }],
            sequences: vec![],
        }
    }

    #[test]
    fn accepts_valid_namespace() {
        let mut id = column("id", "INTEGER");
        id.nullable = false;
        id.primary_key = true;
        assert_eq!(namespace_with(vec![id]).validate(), Ok(()));
    }

    #[test]
    fn rejects_varying_without_length() {
        let ns = namespace_with(vec![column("email", "CHARACTER VARYING")]);
        assert_eq!(
            ns.validate(),
            Err(ValidationError::MissingMaxLength {
                table: "users".to_string(),
                column: "email".to_string(),
            })
        );
    }

    #[test]
    fn rejects_varying_with_zero_length() {
        let mut col = column("email", "CHARACTER VARYING");
        col.max_length = Some(0);
        let ns = namespace_with(vec![col]);
        assert_eq!(
            ns.validate(),
            Err(ValidationError::MissingMaxLength {
                table: "users".to_string(),
                column: "email".to_string(),
            })
        );
    }

    #[test]
    fn rejects_length_on_other_types() {
        let mut col = column("age", "INTEGER");
        col.max_length = Some(10);
        let ns = namespace_with(vec![col]);
        assert!(matches!(
            ns.validate(),
            Err(ValidationError::UnexpectedMaxLength { .. })
        ));
    }

    #[test]
    fn rejects_not_null_without_default_or_pk() {
        let mut col = column("email", "TEXT");
        col.nullable = false;
        let ns = namespace_with(vec![col]);
        assert!(matches!(
            ns.validate(),
            Err(ValidationError::NotNullWithoutDefault { .. })
        ));
    }

    #[test]
    fn accepts_not_null_with_default() {
        let mut col = column("created_at", "TIMESTAMP");
        col.nullable = false;
        col.default = Some("now()".to_string());
        assert_eq!(namespace_with(vec![col]).validate(), Ok(()));
    }

    #[test]
    fn rejects_empty_string_default_as_missing() {
        let mut col = column("email", "TEXT");
        col.nullable = false;
        col.default = Some(String::new());
        assert!(matches!(
            namespace_with(vec![col]).validate(),
            Err(ValidationError::NotNullWithoutDefault { .. })
        ));
    }

    #[test]
    fn rejects_overlong_table_name() {
        let mut ns = namespace_with(vec![]);
        ns.tables[0].name = "t".repeat(64);
        assert!(matches!(
            ns.validate(),
            Err(ValidationError::TableNameTooLong(_))
        ));
    }

    #[test]
    fn rejects_duplicate_tables() {
        let mut ns = namespace_with(vec![]);
        let dup = ns.tables[0].clone();
        ns.tables.push(dup);
        assert!(matches!(
            ns.validate(),
            Err(ValidationError::DuplicateTable { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_namespaces() {
        let a = namespace_with(vec![]);
        let b = namespace_with(vec![]);
        assert!(matches!(
            validate_namespaces(&[a, b]),
            Err(ValidationError::DuplicateNamespace(_))
        ));
    }

    #[test]
    fn rejects_overlong_sequence_name() {
        let mut ns = namespace_with(vec![]);
        ns.sequences.push(Sequence {
            name: "s".repeat(64),
            kind: SequenceKind::BigInt,
        });
        assert!(matches!(
            ns.validate(),
            Err(ValidationError::SequenceNameTooLong(_))
        ));
    }
}
