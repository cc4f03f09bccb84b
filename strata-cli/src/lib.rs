//! # strata-cli
//!
//! Command-line interface for the Strata migration engine. The core is
//! callable without this crate; everything here is argument parsing,
//! environment configuration, and output formatting around
//! `strata-migrate` and `strata-postgres`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
