//! Connection handling.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio_postgres::{Client, Config, NoTls};
use tracing::{debug, error};

use crate::error::{PgError, PgResult};

/// Connection parameters, opaque to the engine core.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl Default for ConnectParams {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            dbname: "postgres".to_string(),
        }
    }
}

impl ConnectParams {
    /// Create parameters with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the user.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the database name.
    pub fn dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = dbname.into();
        self
    }

    fn config(&self) -> Config {
        let mut config = Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .dbname(&self.dbname)
            .connect_timeout(Duration::from_secs(1));
        config
    }
}

/// A connected PostgreSQL adapter.
///
/// Implements the engine's introspection, executor, and ledger contracts.
/// The client sits behind a mutex because those contracts take `&self`
/// while transactions need exclusive access; the engine is a one-shot
/// process, so the lock is never contended.
pub struct PgAdapter {
    name: String,
    pub(crate) client: Mutex<Client>,
}

impl PgAdapter {
    /// Connect and validate the connection.
    pub async fn connect(params: &ConnectParams) -> PgResult<Self> {
        debug!(host = %params.host, dbname = %params.dbname, "connecting to database");

        let (client, connection) = params
            .config()
            .connect(NoTls)
            .await
            .map_err(PgError::Connection)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {e}");
            }
        });

        // Fail fast on a connection that accepted but cannot serve.
        client
            .simple_query("SELECT 1")
            .await
            .map_err(PgError::Connection)?;

        debug!("connected to database");
        Ok(Self {
            name: params.dbname.clone(),
            client: Mutex::new(client),
        })
    }

    /// The connected database's name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
