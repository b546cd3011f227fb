use crate::storage::Database;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Create the shared database handle and try to prepare its tables.
///
/// Failure here is not fatal: the handle retries on every request and each
/// data operation reports its own error.
pub fn initialize_database(path: &Path) -> Arc<Database> {
    let database = Arc::new(Database::new(path));

    if let Err(e) = database.initialize_tables() {
        warn!(error = %e, path = %path.display(), "Database initialization failed");
    }

    database
}
