//! The declarative schema document.
//!
//! Operators describe the desired state in YAML:
//!
//! ```yaml
//! namespaces:
//!   - name: public
//!     tables:
//!       - name: users
//!         columns:
//!           - name: id
//!             type: INTEGER
//!             nullable: false
//!             default: nextval('users_id_seq')
//!     sequences:
//!       - name: users_id_seq
//!         type: bigint
//! ```
//!
//! The document maps 1:1 onto the schema model, so exporting an introspected
//! state and loading it back yields a structurally identical model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ast::{Namespace, ReferentialAction};
use crate::error::{SchemaError, SchemaResult, ValidationError};
use crate::validator::validate_namespaces;

/// A declarative schema document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The declared namespaces.
    pub namespaces: Vec<Namespace>,
}

impl Document {
    /// Create a document from namespaces, normalizing as if loaded.
    pub fn new(namespaces: Vec<Namespace>) -> Self {
        let mut doc = Self { namespaces };
        doc.normalize();
        doc
    }

    /// Parse a document from YAML text.
    pub fn from_str(text: &str) -> SchemaResult<Self> {
        let mut doc: Document = serde_yaml::from_str(text)?;
        doc.normalize();
        Ok(doc)
    }

    /// Read and parse a document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_str(&text)
    }

    /// Serialize the document to YAML text.
    pub fn to_yaml(&self) -> SchemaResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the document to a file.
    pub fn write(&self, path: impl AsRef<Path>) -> SchemaResult<()> {
        let path = path.as_ref();
        let text = self.to_yaml()?;
        std::fs::write(path, text).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Validate every declared namespace against the model invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_namespaces(&self.namespaces)
    }

    /// Canonicalize loaded values to what introspection produces, so
    /// hand-written documents and introspected state diff cleanly against
    /// each other: type names are uppercased, an empty default string means
    /// "no default", and an explicit `NO ACTION` referential action folds
    /// to unset (it is the server default, and introspection reports it as
    /// unset).
    fn normalize(&mut self) {
        for ns in &mut self.namespaces {
            for table in &mut ns.tables {
                for column in &mut table.columns {
                    column.data_type = column.data_type.to_uppercase();
                    if column.default.as_deref() == Some("") {
                        column.default = None;
                    }
                }
                for constraint in &mut table.constraints {
                    if constraint.on_delete == Some(ReferentialAction::NoAction) {
                        constraint.on_delete = None;
                    }
                    if constraint.on_update == Some(ReferentialAction::NoAction) {
                        constraint.on_update = None;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{ConstraintKind, SequenceKind};

    const SIMPLE: &str = r#"
namespaces:
  - name: public
    tables:
      - name: users
        columns:
          - name: id
            type: INTEGER
            nullable: false
            default: nextval('users_id_seq')
          - name: email
            type: CHARACTER VARYING
            max_length: 255
            nullable: true
        constraints:
          - name: users_pkey
            type: PRIMARY KEY
            targets: [id]
        indices:
          - name: idx_users_email
            unique: true
            columns: [email]
    sequences:
      - name: users_id_seq
        type: bigint
"#;

    #[test]
    fn loads_simple_document() {
        let doc = Document::from_str(SIMPLE).unwrap();
        assert_eq!(doc.namespaces.len(), 1);

        let ns = &doc.namespaces[0];
        assert_eq!(ns.name, "public");
        assert_eq!(ns.tables[0].columns.len(), 2);
        assert_eq!(ns.tables[0].columns[1].max_length, Some(255));
        assert_eq!(ns.tables[0].constraints[0].kind, ConstraintKind::PrimaryKey);
        assert!(ns.tables[0].indices[0].unique);
        assert_eq!(ns.sequences[0].kind, SequenceKind::BigInt);
    }

    #[test]
    fn round_trips_structurally() {
        let doc = Document::from_str(SIMPLE).unwrap();
        let reloaded = Document::from_str(&doc.to_yaml().unwrap()).unwrap();
        assert_eq!(doc, reloaded);
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(matches!(
            Document::from_str("namespaces: [title"),
            Err(SchemaError::Yaml(_))
        ));
    }

    #[test]
    fn rejects_unknown_sequence_type() {
        let text = r#"
namespaces:
  - name: public
    sequences:
      - name: s
        type: smallint
"#;
        assert!(matches!(
            Document::from_str(text),
            Err(SchemaError::Yaml(_))
        ));
    }

    #[test]
    fn normalizes_type_case_and_empty_default() {
        let text = r#"
namespaces:
  - name: public
    tables:
      - name: users
        columns:
          - name: bio
            type: text
            nullable: true
            default: ""
"#;
        let doc = Document::from_str(text).unwrap();
        let col = &doc.namespaces[0].tables[0].columns[0];
        assert_eq!(col.data_type, "TEXT");
        assert_eq!(col.default, None);
    }

    #[test]
    fn folds_explicit_no_action_to_unset() {
        let text = r#"
namespaces:
  - name: public
    tables:
      - name: posts
        columns:
          - name: author_id
            type: INTEGER
            nullable: true
        constraints:
          - name: posts_author_fk
            type: FOREIGN KEY
            targets: [author_id]
            reference:
              table: users
              columns: [id]
            on_delete: NO ACTION
            on_update: NO ACTION
"#;
        let doc = Document::from_str(text).unwrap();
        let constraint = &doc.namespaces[0].tables[0].constraints[0];
        assert_eq!(constraint.on_delete, None);
        assert_eq!(constraint.on_update, None);
    }

    #[test]
    fn keeps_non_default_referential_actions() {
        let text = r#"
namespaces:
  - name: public
    tables:
      - name: posts
        columns:
          - name: author_id
            type: INTEGER
            nullable: true
        constraints:
          - name: posts_author_fk
            type: FOREIGN KEY
            targets: [author_id]
            reference:
              table: users
              columns: [id]
            on_delete: CASCADE
"#;
        let doc = Document::from_str(text).unwrap();
        let constraint = &doc.namespaces[0].tables[0].constraints[0];
        assert_eq!(constraint.on_delete, Some(ReferentialAction::Cascade));
        assert_eq!(constraint.on_update, None);
    }

    #[test]
    fn index_algorithm_defaults_to_btree() {
        let doc = Document::from_str(SIMPLE).unwrap();
        assert_eq!(doc.namespaces[0].tables[0].indices[0].algorithm, "btree");
    }

    #[test]
    fn validates_loaded_document() {
        let doc = Document::from_str(SIMPLE).unwrap();
        assert!(doc.validate().is_ok());
    }
}
