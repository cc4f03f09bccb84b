//! # strata-schema
//!
//! Schema model for the Strata migration engine.
//!
//! This crate defines the in-memory representation of a relational schema
//! (databases, namespaces, tables, columns, constraints, indices, sequences),
//! the validation rules that run before any diffing happens, and the
//! declarative YAML document operators use to describe the desired state.
//!
//! The model is deliberately engine-shaped rather than document-shaped: the
//! YAML document maps 1:1 onto these types, and the diff engine consumes the
//! same types that database introspection produces. Loading an exported state
//! and diffing it against the original therefore yields zero actions.

pub mod ast;
pub mod document;
pub mod error;
pub mod validator;

pub use ast::{
    Column, Constraint, ConstraintKind, Database, Index, Namespace, Reference, ReferentialAction,
    Sequence, SequenceKind, Table,
};
pub use document::Document;
pub use error::{SchemaError, SchemaResult, ValidationError};
pub use validator::validate_namespaces;
