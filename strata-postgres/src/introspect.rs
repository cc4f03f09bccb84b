//! Live schema introspection.
//!
//! Reads the full namespace/table/column/constraint/index/sequence tree
//! from the server catalogs and normalizes it into the schema model:
//! system namespaces are excluded, type names are uppercased, trailing
//! `::<type>` casts are stripped from defaults, and server code letters
//! are mapped onto the model enums.

use std::sync::LazyLock;

use regex_lite::Regex;
use strata_migrate::{Introspector, MigrateResult, MigrationError};
use strata_schema::{
    Column, Constraint, ConstraintKind, Database, Index, Namespace, Reference, ReferentialAction,
    Sequence, SequenceKind, Table,
};
use tokio_postgres::Client;
use tracing::debug;

use crate::connection::PgAdapter;
use crate::error::{PgError, PgResult};

static INDEX_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"CREATE( UNIQUE)? INDEX (\w+) ON (\w+)\.(\w+) USING (\w+) \((.+)\)")
        .expect("index definition regex")
});

/// Parse a `pg_indexes.indexdef` entry.
pub(crate) fn parse_index_definition(definition: &str) -> PgResult<Index> {
    let captures = INDEX_DEFINITION
        .captures(definition)
        .ok_or_else(|| PgError::IndexDefinition(definition.to_string()))?;

    Ok(Index {
        name: captures[2].to_string(),
        unique: captures.get(1).is_some(),
        algorithm: captures[5].to_string(),
        columns: captures[6].split(", ").map(str::to_string).collect(),
    })
}

/// Strip every `::<type>` cast of the column's own type from a default
/// expression, e.g. `'active'::text` becomes `'active'`.
pub(crate) fn strip_default_cast(default: &str, data_type: &str) -> String {
    default.replace(&format!("::{data_type}"), "")
}

impl PgAdapter {
    async fn namespaces(&self, client: &Client) -> PgResult<Vec<Namespace>> {
        let rows = client
            .query(
                "SELECT schema_name::text
                 FROM information_schema.schemata
                 WHERE schema_name NOT LIKE 'pg_%'
                   AND schema_name <> 'information_schema'
                 ORDER BY schema_name",
                &[],
            )
            .await?;

        let mut namespaces = Vec::new();
        for row in rows {
            let name: String = row.get(0);
            debug!(namespace = %name, "introspecting namespace");
            let tables = self.tables(client, &name).await?;
            let sequences = self.sequences(client, &name).await?;
            namespaces.push(Namespace {
                name,
                tables,
                sequences,
            });
        }
        Ok(namespaces)
    }

    async fn tables(&self, client: &Client, namespace: &str) -> PgResult<Vec<Table>> {
        let rows = client
            .query(
                "SELECT tablename::text
                 FROM pg_tables
                 WHERE schemaname = $1
                 ORDER BY tablename",
                &[&namespace],
            )
            .await?;

        let mut tables = Vec::new();
        for row in rows {
            let name: String = row.get(0);
            let columns = self.columns(client, namespace, &name).await?;
            let constraints = self.constraints(client, namespace, &name).await?;
            let indices = self.indices(client, namespace, &name).await?;
            tables.push(Table {
                name,
                columns,
                constraints,
                indices,
            });
        }
        Ok(tables)
    }

    async fn columns(
        &self,
        client: &Client,
        namespace: &str,
        table: &str,
    ) -> PgResult<Vec<Column>> {
        let rows = client
            .query(
                "SELECT column_name::text, data_type::text, column_default::text,
                        is_nullable::text, character_maximum_length
                 FROM information_schema.columns
                 WHERE table_schema = $1 AND table_name = $2
                 ORDER BY ordinal_position",
                &[&namespace, &table],
            )
            .await?;

        let mut columns = Vec::new();
        for row in rows {
            let name: String = row.get(0);
            let data_type: String = row.get(1);
            let default: Option<String> = row.get(2);
            let is_nullable: String = row.get(3);
            let max_length: Option<i32> = row.get(4);

            columns.push(Column {
                name,
                data_type: data_type.to_uppercase(),
                max_length: max_length.map(|l| l as u32),
                nullable: is_nullable == "YES",
                default: default
                    .map(|d| strip_default_cast(&d, &data_type))
                    .filter(|d| !d.is_empty()),
                primary_key: false,
            });
        }
        Ok(columns)
    }

    async fn constraints(
        &self,
        client: &Client,
        namespace: &str,
        table: &str,
    ) -> PgResult<Vec<Constraint>> {
        let rows = client
            .query(
                "SELECT
                     con.conname::text AS constraint_name,
                     con.contype::text AS constraint_type,
                     con.confupdtype::text AS update_action,
                     con.confdeltype::text AS delete_action,
                     ARRAY(
                         SELECT column_name::text
                         FROM information_schema.columns
                         WHERE table_name = rel2.relname AND ordinal_position IN (
                             SELECT ord_pos FROM UNNEST(con.conkey) ord_pos
                         )
                     ) AS source_columns,
                     rel1.relname::text AS referenced_table,
                     ARRAY(
                         SELECT column_name::text
                         FROM information_schema.columns
                         WHERE table_name = rel1.relname AND ordinal_position IN (
                             SELECT ord_pos FROM UNNEST(con.confkey) ord_pos
                         )
                     ) AS referenced_columns
                 FROM pg_constraint con
                 LEFT JOIN pg_catalog.pg_class rel1 ON rel1.oid = con.confrelid
                 JOIN pg_catalog.pg_class rel2 ON rel2.oid = con.conrelid
                 JOIN pg_catalog.pg_namespace nsp ON nsp.oid = con.connamespace
                 WHERE nsp.nspname = $1 AND rel2.relname = $2
                 ORDER BY con.conname",
                &[&namespace, &table],
            )
            .await?;

        let mut constraints = Vec::new();
        for row in rows {
            let name: String = row.get(0);
            let type_code: String = row.get(1);
            let update_code: String = row.get(2);
            let delete_code: String = row.get(3);
            let targets: Vec<String> = row.get(4);
            let referenced_table: Option<String> = row.get(5);
            let referenced_columns: Vec<String> = row.get(6);

            let code = type_code.chars().next().unwrap_or_default();
            let kind =
                ConstraintKind::from_code(code).ok_or(PgError::ConstraintType(code))?;

            let (reference, on_delete, on_update) = if kind == ConstraintKind::ForeignKey {
                (
                    referenced_table.map(|table| Reference {
                        table,
                        columns: referenced_columns,
                    }),
                    action_from(&delete_code),
                    action_from(&update_code),
                )
            } else {
                (None, None, None)
            };

            constraints.push(Constraint {
                name,
                kind,
                targets,
                reference,
                on_delete,
                on_update,
            });
        }
        Ok(constraints)
    }

    async fn indices(
        &self,
        client: &Client,
        namespace: &str,
        table: &str,
    ) -> PgResult<Vec<Index>> {
        let rows = client
            .query(
                "SELECT indexdef
                 FROM pg_indexes
                 WHERE schemaname = $1 AND tablename = $2
                 ORDER BY indexname",
                &[&namespace, &table],
            )
            .await?;

        rows.iter()
            .map(|row| parse_index_definition(row.get(0)))
            .collect()
    }

    async fn sequences(&self, client: &Client, namespace: &str) -> PgResult<Vec<Sequence>> {
        let rows = client
            .query(
                "SELECT sequence_name::text, data_type::text
                 FROM information_schema.sequences
                 WHERE sequence_schema = $1
                 ORDER BY sequence_name",
                &[&namespace],
            )
            .await?;

        rows.iter()
            .map(|row| {
                let name: String = row.get(0);
                let data_type: String = row.get(1);
                let kind = SequenceKind::from_sql_type(&data_type)
                    .ok_or(PgError::SequenceType(data_type))?;
                Ok(Sequence { name, kind })
            })
            .collect()
    }
}

/// Referential action codes, with the server default (`a`, NO ACTION)
/// folded to "unset" so introspected constraints compare cleanly against
/// documents that omit the action.
fn action_from(code: &str) -> Option<ReferentialAction> {
    ReferentialAction::from_code(code.chars().next()?)
        .filter(|action| *action != ReferentialAction::NoAction)
}

#[async_trait::async_trait]
impl Introspector for PgAdapter {
    async fn introspect(&self) -> MigrateResult<Database> {
        let client = self.client.lock().await;
        let namespaces = self
            .namespaces(&client)
            .await
            .map_err(|e| MigrationError::introspection(e.to_string()))?;
        Ok(Database {
            name: self.name().to_string(),
            namespaces,
        })
    }
}
