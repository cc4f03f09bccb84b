//! The schema model.
//!
//! One file per entity, leaves first. All types derive `Serialize` /
//! `Deserialize` and map 1:1 onto the declarative document shape.

mod column;
mod constraint;
mod index;
mod namespace;
mod table;

pub use column::Column;
pub use constraint::{Constraint, ConstraintKind, Reference, ReferentialAction};
pub use index::Index;
pub use namespace::{Database, Namespace, Sequence, SequenceKind};
pub use table::Table;

/// PostgreSQL identifier length limit.
pub const MAX_NAME_LEN: usize = 63;

pub(crate) fn is_false(v: &bool) -> bool {
    !*v
}
