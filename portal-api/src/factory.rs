//! Composition root: the only place that picks concrete search collaborators.

use std::sync::Arc;

use portal_search::{
    directory::{InMemoryDirectory, StaticFilePermissions},
    PermissionMatrix, SearchService, Searcher,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::{
    adapters::outbound::postgres::{PgDirectory, PgFilePermissions},
    config::{SearchBackend, Settings},
};

/// Build the searcher for the configured backend.
///
/// The Postgres pool connects lazily, so a database outage surfaces as
/// per-module failures instead of a startup error.
pub fn create_searcher(settings: &Settings) -> Arc<dyn Searcher> {
    let matrix = Arc::new(PermissionMatrix::portal_defaults());

    match settings.search.backend {
        SearchBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(settings.database.max_connections)
                .connect_lazy_with(settings.database.with_db());
            info!(
                host = %settings.database.host,
                database = %settings.database.database_name,
                "Using Postgres search backend"
            );

            Arc::new(SearchService::new(
                PgDirectory::new(pool.clone()),
                PgFilePermissions::new(pool, matrix),
            ))
        }
        SearchBackend::Memory => {
            info!("Using in-memory search backend");
            Arc::new(SearchService::new(
                InMemoryDirectory::new(),
                StaticFilePermissions::shared(matrix),
            ))
        }
    }
}
