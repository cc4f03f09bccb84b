//! # strata-postgres
//!
//! PostgreSQL adapter for the Strata migration engine.
//!
//! [`PgAdapter`] implements the three contracts the engine needs:
//! introspection (reading the live schema into the model), transactional
//! execution (one transaction per migration, rollback on any failure), and
//! the applied-migration ledger.

pub mod connection;
pub mod error;
mod executor;
mod introspect;

pub use connection::{ConnectParams, PgAdapter};
pub use error::{PgError, PgResult};
