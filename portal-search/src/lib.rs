//! Global Search - grouped search across the admin portal's entity collections.
//!
//! This crate provides the search bar backend for the portal:
//! - **Query sanitizing** of raw input before anything reaches the database
//! - **Per-module search** over users, files, companies, contacts and payment methods
//! - **Fan-out aggregation** into a single grouped [`SearchResponse`]
//! - **Debounced search sessions** with cancellation of stale requests
//!
//! # Architecture
//!
//! The search system is built around trait abstractions for testability:
//!
//! - [`DirectoryRepository`] - Row lookups in the portal's tables (Postgres, in-memory)
//! - [`FilePermissionChecker`] - Per-file view permission checks
//! - [`Searcher`] - Anything that can answer a global search (used by [`SearchSession`])
//!
//! # Example
//!
//! ```ignore
//! use portal_search::{SearchOptions, SearchService};
//!
//! let service = SearchService::new(directory, permissions);
//! let options = SearchOptions::for_caller("42", "admin");
//! let response = service.global_search("mar", &options).await?;
//! println!("{} results in {} ms", response.total_results, response.search_time);
//! ```
//!
//! # Sessions
//!
//! A [`SearchSession`] sits between a text input and the service. Feed it every
//! keystroke with [`SearchSession::set_query`]; it waits for typing to pause, keeps
//! at most one request current and drops responses that arrive after the query
//! moved on.

mod aggregator;
mod error;
mod modules;
mod permissions;
mod ranking;
mod role;
mod sanitize;
mod session;
mod traits;
mod types;

pub mod directory;

// Re-export main types
pub use aggregator::{global_search, SearchService};
pub use error::{ErrorCode, SearchError};
pub use modules::{
    search_companies, search_contacts, search_files, search_payment_methods, search_users,
};
pub use permissions::{Action, Module, PermissionMatrix};
pub use ranking::{rank_results, score};
pub use role::Role;
pub use sanitize::{is_valid_query, sanitize, MAX_QUERY_LENGTH};
pub use session::{SearchSession, SessionSnapshot, SessionStatus};
pub use traits::{
    DirectoryError, DirectoryRepository, DirectoryResult, FilePermissionChecker, Searcher,
};
pub use types::{
    CallerIdentity, CompanyRecord, ContactRecord, PaymentMethodRecord, ResultType,
    SearchOptions, SearchResponse, SearchResult, StorageItemKind, StorageItemRecord, UserRecord,
};
