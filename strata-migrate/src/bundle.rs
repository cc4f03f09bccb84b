//! Versioned migration bundles on disk.
//!
//! A bundle is a directory `<version>_<description>` holding the forward
//! SQL (`up.sql`), the reverse SQL (`down.sql`), and metadata (`plan.yaml`)
//! with a SHA-256 checksum of the forward SQL. Bundles are created by
//! `plan` and read-only afterwards; any later edit shows up as a checksum
//! mismatch.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{MigrateResult, MigrationError};

const UP_FILE: &str = "up.sql";
const DOWN_FILE: &str = "down.sql";
const PLAN_FILE: &str = "plan.yaml";

/// A versioned migration bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    /// Monotonic, lexicographically sortable version (`YYYYMMDD_HHMMSS`).
    pub version: String,
    /// Sanitized description: lowercase `[a-z0-9_]`, at most 60 chars.
    pub description: String,
    /// Lowercase hex SHA-256 of the forward SQL bytes.
    pub checksum: String,
    /// When the bundle was planned.
    pub created_at: DateTime<Utc>,
    /// Forward SQL, one statement per line.
    #[serde(skip)]
    pub up_sql: String,
    /// Reverse SQL, one statement (or warning comment) per line.
    #[serde(skip)]
    pub down_sql: String,
}

impl Bundle {
    /// Create a bundle from freshly generated SQL, versioned now.
    pub fn new(description: &str, up_sql: String, down_sql: String) -> Self {
        let now = Utc::now();
        Self {
            version: now.format("%Y%m%d_%H%M%S").to_string(),
            description: sanitize_description(description),
            checksum: compute_checksum(&up_sql),
            created_at: now,
            up_sql,
            down_sql,
        }
    }

    /// The bundle's directory name: `<version>_<description>`.
    pub fn dir_name(&self) -> String {
        format!("{}_{}", self.version, self.description)
    }

    /// Recompute the forward checksum and compare against the recorded one.
    pub fn verify_checksum(&self) -> bool {
        compute_checksum(&self.up_sql) == self.checksum
    }

    /// Forward statements, skipping blank lines.
    pub fn up_statements(&self) -> Vec<String> {
        statements(&self.up_sql, false)
    }

    /// Reverse statements, skipping blank lines and `--` comment lines.
    ///
    /// Warning comments mark irreversible actions; they are dropped here so
    /// the executor only sees runnable statements.
    pub fn down_statements(&self) -> Vec<String> {
        statements(&self.down_sql, true)
    }
}

fn statements(sql: &str, skip_comments: bool) -> Vec<String> {
    sql.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !(skip_comments && line.starts_with("--")))
        .map(str::to_string)
        .collect()
}

/// Lowercase hex SHA-256 of the content.
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

fn sanitize_description(description: &str) -> String {
    let mut safe: String = description
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();
    safe.truncate(60);
    safe
}

/// Reads and writes bundles under a caller-designated directory.
pub struct BundleStore {
    migrations_dir: PathBuf,
}

impl BundleStore {
    /// Create a store rooted at the given directory.
    pub fn new(migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            migrations_dir: migrations_dir.into(),
        }
    }

    /// The migrations directory.
    pub fn migrations_dir(&self) -> &Path {
        &self.migrations_dir
    }

    /// Write a bundle to disk, returning its directory.
    pub async fn write(&self, bundle: &Bundle) -> MigrateResult<PathBuf> {
        let dir = self.migrations_dir.join(bundle.dir_name());
        tokio::fs::create_dir_all(&dir).await?;

        tokio::fs::write(dir.join(UP_FILE), &bundle.up_sql).await?;
        tokio::fs::write(dir.join(DOWN_FILE), &bundle.down_sql).await?;
        tokio::fs::write(dir.join(PLAN_FILE), serde_yaml::to_string(bundle)?).await?;

        debug!(dir = %dir.display(), "wrote migration bundle");
        Ok(dir)
    }

    /// Load a single bundle from its directory.
    pub async fn load(&self, dir: &Path) -> MigrateResult<Bundle> {
        let plan = tokio::fs::read_to_string(dir.join(PLAN_FILE))
            .await
            .map_err(|_| {
                MigrationError::invalid_bundle(format!(
                    "missing {PLAN_FILE} in {}",
                    dir.display()
                ))
            })?;
        let mut bundle: Bundle = serde_yaml::from_str(&plan)?;

        bundle.up_sql = tokio::fs::read_to_string(dir.join(UP_FILE)).await.map_err(|_| {
            MigrationError::invalid_bundle(format!("missing {UP_FILE} in {}", dir.display()))
        })?;
        bundle.down_sql = tokio::fs::read_to_string(dir.join(DOWN_FILE))
            .await
            .map_err(|_| {
                MigrationError::invalid_bundle(format!(
                    "missing {DOWN_FILE} in {}",
                    dir.display()
                ))
            })?;

        Ok(bundle)
    }

    /// Load all bundles, ascending by version.
    ///
    /// A missing migrations directory is an empty list, not an error.
    pub async fn load_all(&self) -> MigrateResult<Vec<Bundle>> {
        if !self.migrations_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = tokio::fs::read_dir(&self.migrations_dir).await?;
        let mut bundles = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_dir() {
                bundles.push(self.load(&path).await?);
            }
        }

        bundles.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(bundles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(version: &str, up: &str) -> Bundle {
        let mut b = Bundle::new("test migration", up.to_string(), String::new());
        b.version = version.to_string();
        b
    }

    #[test]
    fn checksum_is_sha256_hex() {
        let sum = compute_checksum("CREATE TABLE public.users ();");
        assert_eq!(sum.len(), 64);
        assert!(sum.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(sum, compute_checksum("CREATE TABLE public.users ();"));
        assert_ne!(sum, compute_checksum("DROP TABLE public.users;"));
    }

    #[test]
    fn sanitizes_description() {
        assert_eq!(sanitize_description("Add Users Table"), "add_users_table");
        assert_eq!(sanitize_description("emoji ☃ & punctuation!"), "emoji___punctuation");
        assert_eq!(sanitize_description(&"x".repeat(100)).len(), 60);
    }

    #[test]
    fn dir_name_joins_version_and_description() {
        let b = bundle("20240101_120000", "SELECT 1;");
        assert_eq!(b.dir_name(), "20240101_120000_test_migration");
    }

    #[test]
    fn verify_checksum_detects_tampering() {
        let mut b = bundle("20240101_120000", "CREATE TABLE public.users ();");
        assert!(b.verify_checksum());
        b.up_sql.push_str("\nDROP TABLE public.other;");
        assert!(!b.verify_checksum());
    }

    #[test]
    fn down_statements_skip_warning_comments() {
        let mut b = bundle("20240101_120000", "CREATE TABLE public.users ();");
        b.down_sql = "-- WARNING: Cannot automatically reverse DROP TABLE t.\n\
                      DROP TABLE public.users;\n\n"
            .to_string();
        assert_eq!(b.down_statements(), vec!["DROP TABLE public.users;"]);
    }

    #[tokio::test]
    async fn write_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = BundleStore::new(dir.path());

        let original = Bundle::new(
            "create users",
            "CREATE TABLE public.users ();".to_string(),
            "DROP TABLE public.users;".to_string(),
        );
        let written = store.write(&original).await.unwrap();

        let loaded = store.load(&written).await.unwrap();
        assert_eq!(loaded.version, original.version);
        assert_eq!(loaded.description, "create_users");
        assert_eq!(loaded.up_sql, original.up_sql);
        assert_eq!(loaded.down_sql, original.down_sql);
        assert!(loaded.verify_checksum());
    }

    #[tokio::test]
    async fn load_all_sorts_by_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = BundleStore::new(dir.path());

        let older = bundle("20240101_120000", "SELECT 1;");
        let newer = bundle("20240202_120000", "SELECT 2;");
        store.write(&newer).await.unwrap();
        store.write(&older).await.unwrap();

        let versions: Vec<String> = store
            .load_all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.version)
            .collect();
        assert_eq!(versions, vec!["20240101_120000", "20240202_120000"]);
    }

    #[tokio::test]
    async fn missing_directory_is_empty_not_error() {
        let store = BundleStore::new("/nonexistent/migrations/dir");
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bundle_without_plan_yaml_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let stray = dir.path().join("20240101_120000_stray");
        tokio::fs::create_dir_all(&stray).await.unwrap();

        let store = BundleStore::new(dir.path());
        assert!(matches!(
            store.load_all().await,
            Err(MigrationError::InvalidBundle(_))
        ));
    }
}
