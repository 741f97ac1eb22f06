//! Embedded SQL migrations.
//!
//! Migrations run over a plain synchronous connection on a blocking task at
//! startup; the async pool is only built for request traffic.

use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

pub(crate) const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply any pending migrations against the given database.
///
/// # Errors
///
/// Returns a descriptive error string when the connection or a migration
/// fails; the caller decides whether that is fatal.
pub async fn run_pending_migrations(database_url: String) -> Result<(), String> {
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|error| format!("failed to connect for migrations: {error}"))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|error| format!("failed to run migrations: {error}"))?;
        for migration in &applied {
            info!(migration = %migration, "applied migration");
        }
        Ok(())
    })
    .await
    .map_err(|error| format!("migration task panicked: {error}"))?
}
