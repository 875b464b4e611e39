//! File permission checker backed by the static role table.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::permissions::{Action, Module, PermissionMatrix};
use crate::role::Role;
use crate::traits::{DirectoryError, DirectoryResult, FilePermissionChecker};
use crate::types::StorageItemRecord;

/// Answers file visibility from a [`PermissionMatrix`], with optional per-file overrides.
#[derive(Clone)]
pub struct StaticFilePermissions {
    matrix: Arc<PermissionMatrix>,
    hidden: Arc<HashSet<String>>,
    failing: Arc<HashSet<String>>,
    call_count: Arc<AtomicUsize>,
}

impl StaticFilePermissions {
    pub fn new(matrix: PermissionMatrix) -> Self {
        Self::shared(Arc::new(matrix))
    }

    pub fn shared(matrix: Arc<PermissionMatrix>) -> Self {
        Self {
            matrix,
            hidden: Arc::default(),
            failing: Arc::default(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Deny these file IDs for every role.
    pub fn with_hidden<I, S>(mut self, file_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden = Arc::new(file_ids.into_iter().map(Into::into).collect());
        self
    }

    /// Fail the check for these file IDs.
    pub fn failing_for<I, S>(mut self, file_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing = Arc::new(file_ids.into_iter().map(Into::into).collect());
        self
    }

    /// Get the number of times `can_view_file` was called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FilePermissionChecker for StaticFilePermissions {
    async fn can_view_file(&self, file: &StorageItemRecord, role: Role) -> DirectoryResult<bool> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(&file.id) {
            return Err(DirectoryError::PermissionError(format!(
                "no permission record for file {}",
                file.id
            )));
        }

        if self.hidden.contains(&file.id) {
            return Ok(false);
        }

        Ok(self.matrix.allows(role, Module::Files, Action::View))
    }
}
