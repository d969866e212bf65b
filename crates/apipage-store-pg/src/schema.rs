//! Database schema migrations.

use sqlx::migrate::Migrator;

/// Migrations from the workspace `migrations/` directory, embedded at
/// compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");
