use std::sync::Arc;

use portal_search::Searcher;

use crate::config::SearchSettings;

#[derive(Clone)]
pub struct AppState {
    searcher: Arc<dyn Searcher>,
    search_settings: SearchSettings,
}

impl AppState {
    pub fn new(searcher: Arc<dyn Searcher>, search_settings: SearchSettings) -> Self {
        Self {
            searcher,
            search_settings,
        }
    }

    pub fn searcher(&self) -> &dyn Searcher {
        self.searcher.as_ref()
    }

    pub fn search_settings(&self) -> &SearchSettings {
        &self.search_settings
    }
}
