//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema (including foreign keys and their `ON DELETE` actions) always matches the
//! Rust structs without hand-written SQL.

use crate::entities::{Parent, Payment, Student, Teacher};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/pta_tracker.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_file_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Directory holding a file-backed `SQLite` database, if the URL names one.
fn sqlite_file_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Creates all tables if they do not exist yet.
///
/// Parents and teachers are created before students and payments because the latter
/// reference them through foreign keys.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        schema.create_table_from_entity(Parent),
        schema.create_table_from_entity(Teacher),
        schema.create_table_from_entity(Student),
        schema.create_table_from_entity(Payment),
    ];

    for mut table in tables {
        table.if_not_exists();
        db.execute(builder.build(&table)).await?;
    }

    info!("Database tables ensured");
    Ok(())
}
