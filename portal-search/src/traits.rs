//! Trait definitions for search domain abstractions.
//!
//! These traits enable dependency injection and easy testing through in-memory fakes.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::SearchError;
use crate::role::Role;
use crate::types::{
    CompanyRecord, ContactRecord, PaymentMethodRecord, SearchOptions, SearchResponse,
    StorageItemRecord, UserRecord,
};

/// Error type for the data collaborators behind the search.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Permission check failed: {0}")]
    PermissionError(String),

    #[error("{0}")]
    Other(String),
}

pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// Row lookups against the portal's tables.
///
/// Every `find_*` method matches `query` as a case-insensitive substring
/// against the fields listed on it and returns at most `limit` rows.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Match first name, last names, email, username and national ID.
    async fn find_users(&self, query: &str, limit: usize) -> DirectoryResult<Vec<UserRecord>>;

    /// Match file and folder names.
    async fn find_storage_items(
        &self,
        query: &str,
        limit: usize,
    ) -> DirectoryResult<Vec<StorageItemRecord>>;

    /// Match company names.
    async fn find_companies(
        &self,
        query: &str,
        limit: usize,
    ) -> DirectoryResult<Vec<CompanyRecord>>;

    /// Match contact name, email, phone and position.
    async fn find_contacts(&self, query: &str, limit: usize)
        -> DirectoryResult<Vec<ContactRecord>>;

    /// Resolve company names for a batch of company IDs.
    ///
    /// Unknown IDs are simply absent from the returned map.
    async fn company_names(&self, company_ids: &[String])
        -> DirectoryResult<HashMap<String, String>>;

    /// Match company name, tax ID and bank name over active payment methods only.
    async fn find_payment_methods(
        &self,
        query: &str,
        limit: usize,
    ) -> DirectoryResult<Vec<PaymentMethodRecord>>;
}

/// Per-file view permission check.
#[async_trait]
pub trait FilePermissionChecker: Send + Sync {
    async fn can_view_file(&self, file: &StorageItemRecord, role: Role) -> DirectoryResult<bool>;
}

/// Anything that can answer a global search.
///
/// Implemented by [`crate::SearchService`]; sessions and HTTP handlers depend on
/// this trait so they can be exercised without a database.
#[async_trait]
pub trait Searcher: Send + Sync {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify traits are object-safe (can be used as trait objects)
    fn _assert_directory_object_safe(_: &dyn DirectoryRepository) {}
    fn _assert_permissions_object_safe(_: &dyn FilePermissionChecker) {}
    fn _assert_searcher_object_safe(_: &dyn Searcher) {}

    #[test]
    fn directory_error_messages() {
        assert_eq!(
            DirectoryError::DatabaseError("timeout".to_string()).to_string(),
            "Database error: timeout"
        );
        assert_eq!(DirectoryError::Other("nope".to_string()).to_string(), "nope");
    }
}
