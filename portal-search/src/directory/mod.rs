//! In-memory collaborator implementations.
//!
//! Used by tests across the workspace and by the API's `memory` backend for local
//! development without a database.

mod memory;
mod permissions;

pub use memory::InMemoryDirectory;
pub use permissions::StaticFilePermissions;
