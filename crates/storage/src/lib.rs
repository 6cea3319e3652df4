//! PostgreSQL + pgvector storage backend for cardy.

mod error;
mod pg;
mod pg_migrations;
pub mod traits;

pub use error::StorageError;
pub use pg::PgStorage;
pub use pg_migrations::run_pg_migrations;
