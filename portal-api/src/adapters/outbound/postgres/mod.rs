//! Postgres-backed search collaborators.

mod directory;
mod file_permissions;
mod rows;

pub use directory::PgDirectory;
pub use file_permissions::PgFilePermissions;
