//! Global search: fan a query out to every module and group the results.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, error, instrument};

use crate::error::SearchError;
use crate::modules::{
    search_companies, search_contacts, search_files, search_payment_methods, search_users,
};
use crate::permissions::Module;
use crate::ranking::rank_results;
use crate::sanitize::{is_valid_query, sanitize};
use crate::traits::{DirectoryRepository, FilePermissionChecker, Searcher};
use crate::types::{SearchOptions, SearchResponse, SearchResult};

/// Run a global search across all five modules.
///
/// Queries shorter than `options.min_query_length` (after sanitizing) return an
/// empty success without touching the directory. The module searches run
/// concurrently, so latency is bounded by the slowest one. A panic inside one
/// module empties only that module's list. A limit of zero yields empty lists.
pub async fn global_search<D, P>(
    directory: &D,
    permissions: &P,
    query: &str,
    options: &SearchOptions,
) -> Result<SearchResponse, SearchError>
where
    D: DirectoryRepository + ?Sized,
    P: FilePermissionChecker + ?Sized,
{
    let started = Instant::now();

    let query = sanitize(query);
    if !is_valid_query(&query, options.min_query_length) {
        return Ok(SearchResponse::default());
    }

    let caller = options.caller()?;
    if options.limit == 0 {
        return Ok(SearchResponse::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            started.elapsed(),
        ));
    }
    let limit = options.limit;

    let fan_out = async {
        tokio::join!(
            isolated(
                Module::Users,
                &query,
                search_users(directory, &query, &caller, limit)
            ),
            isolated(
                Module::Files,
                &query,
                search_files(directory, permissions, &query, &caller, limit)
            ),
            isolated(
                Module::Companies,
                &query,
                search_companies(directory, &query, limit)
            ),
            isolated(
                Module::Contacts,
                &query,
                search_contacts(directory, &query, limit)
            ),
            isolated(
                Module::PaymentMethods,
                &query,
                search_payment_methods(directory, &query, limit)
            ),
        )
    };

    let (mut users, mut files, mut companies, mut contacts, mut payment_methods) =
        AssertUnwindSafe(fan_out)
            .catch_unwind()
            .await
            .map_err(|panic| {
                let message = panic_message(panic.as_ref())
                    .unwrap_or_else(|| "unexpected failure during search".to_string());
                error!(query = %query, error = %message, "Global search aborted");
                SearchError::search(message)
            })?;

    if options.rank {
        users = rank_results(users, &query);
        files = rank_results(files, &query);
        companies = rank_results(companies, &query);
        contacts = rank_results(contacts, &query);
        payment_methods = rank_results(payment_methods, &query);
    }

    let response = SearchResponse::new(
        users,
        files,
        companies,
        contacts,
        payment_methods,
        started.elapsed(),
    );

    debug!(
        query = %query,
        total = response.total_results,
        elapsed_ms = response.search_time,
        "Global search completed"
    );

    Ok(response)
}

/// Run one module search, turning a panic into an empty result list.
async fn isolated<F>(module: Module, query: &str, search: F) -> Vec<SearchResult>
where
    F: Future<Output = Vec<SearchResult>>,
{
    AssertUnwindSafe(search)
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| {
            let message = panic_message(panic.as_ref())
                .unwrap_or_else(|| "unexpected failure during search".to_string());
            error!(module = %module, query = %query, error = %message, "Module search panicked");
            Vec::new()
        })
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> Option<String> {
    if let Some(message) = panic.downcast_ref::<&str>() {
        Some(message.to_string())
    } else {
        panic.downcast_ref::<String>().cloned()
    }
}

/// Global search service over a directory and a file permission checker.
///
/// # Type Parameters
///
/// * `D` - DirectoryRepository implementation for row lookups
/// * `P` - FilePermissionChecker implementation for file visibility
///
/// # Examples
///
/// ```ignore
/// let service = SearchService::new(PgDirectory::new(pool.clone()), PgFilePermissions::new(pool, matrix));
/// let response = service.global_search("mar", &SearchOptions::for_caller("42", "admin")).await?;
/// ```
pub struct SearchService<D, P>
where
    D: DirectoryRepository,
    P: FilePermissionChecker,
{
    directory: D,
    permissions: P,
}

impl<D, P> SearchService<D, P>
where
    D: DirectoryRepository,
    P: FilePermissionChecker,
{
    pub fn new(directory: D, permissions: P) -> Self {
        Self {
            directory,
            permissions,
        }
    }

    /// Execute a global search. See [`global_search`].
    #[instrument(
        name = "global_search",
        skip(self, options),
        fields(user_id = ?options.user_id, role = ?options.user_role)
    )]
    pub async fn global_search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, SearchError> {
        global_search(&self.directory, &self.permissions, query, options).await
    }
}

#[async_trait]
impl<D, P> Searcher for SearchService<D, P>
where
    D: DirectoryRepository,
    P: FilePermissionChecker,
{
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, SearchError> {
        self.global_search(query, options).await
    }
}
