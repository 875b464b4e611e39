use std::sync::Arc;

use async_trait::async_trait;
use portal_search::{
    Action, DirectoryResult, FilePermissionChecker, Module, PermissionMatrix, Role,
    StorageItemRecord,
};
use sqlx::PgPool;
use tracing::debug;

use crate::repositories::RepositoryError;

/// Per-file visibility from `file_permissions`, falling back to the role
/// matrix when a file has no row for the role.
#[derive(Clone)]
pub struct PgFilePermissions {
    pool: PgPool,
    matrix: Arc<PermissionMatrix>,
}

impl PgFilePermissions {
    pub fn new(pool: PgPool, matrix: Arc<PermissionMatrix>) -> Self {
        Self { pool, matrix }
    }
}

#[async_trait]
impl FilePermissionChecker for PgFilePermissions {
    async fn can_view_file(&self, file: &StorageItemRecord, role: Role) -> DirectoryResult<bool> {
        let can_view = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT can_view
            FROM file_permissions
            WHERE file_id::text = $1 AND role = $2
            "#,
        )
        .bind(&file.id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(can_view.unwrap_or_else(|| {
            debug!(file_id = %file.id, %role, "No file permission row, using role defaults");
            self.matrix.allows(role, Module::Files, Action::View)
        }))
    }
}
