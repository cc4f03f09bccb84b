//! Connection configuration from the environment.
//!
//! Parameters come from `DATABASE_HOST`, `DATABASE_PORT`, `DATABASE_USER`,
//! `DATABASE_PASSWORD`, and `DATABASE_NAME`; anything unset falls back to
//! the adapter defaults.

use strata_postgres::ConnectParams;
use tracing::warn;

/// Build connection parameters from the environment.
pub fn connect_params() -> ConnectParams {
    let mut params = ConnectParams::new();

    if let Ok(host) = std::env::var("DATABASE_HOST") {
        params = params.host(host);
    }
    if let Ok(port) = std::env::var("DATABASE_PORT") {
        match port.parse() {
            Ok(port) => params = params.port(port),
            Err(e) => warn!("could not parse DATABASE_PORT: {e}"),
        }
    }
    if let Ok(user) = std::env::var("DATABASE_USER") {
        params = params.user(user);
    }
    if let Ok(password) = std::env::var("DATABASE_PASSWORD") {
        params = params.password(password);
    }
    if let Ok(name) = std::env::var("DATABASE_NAME") {
        params = params.dbname(name);
    }

    params
}
