//! Core types for the search domain.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use crate::error::SearchError;
use crate::role::Role;

/// Which kind of entity a result points at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResultType {
    User,
    File,
    Company,
    Contact,
    PaymentMethod,
}

/// Uniform envelope for one search hit, regardless of the module it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "type")]
    pub result_type: ResultType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Route inside the portal that opens the underlying entity
    pub navigation_path: String,
    /// Type-specific extra fields
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Grouped search results, one list per module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub users: Vec<SearchResult>,
    pub files: Vec<SearchResult>,
    pub companies: Vec<SearchResult>,
    pub contacts: Vec<SearchResult>,
    pub payment_methods: Vec<SearchResult>,
    /// Always the sum of the five list lengths
    pub total_results: usize,
    /// Wall-clock time spent searching, in milliseconds
    pub search_time: u64,
}

impl SearchResponse {
    pub fn new(
        users: Vec<SearchResult>,
        files: Vec<SearchResult>,
        companies: Vec<SearchResult>,
        contacts: Vec<SearchResult>,
        payment_methods: Vec<SearchResult>,
        search_time: Duration,
    ) -> Self {
        let total_results =
            users.len() + files.len() + companies.len() + contacts.len() + payment_methods.len();

        Self {
            users,
            files,
            companies,
            contacts,
            payment_methods,
            total_results,
            search_time: u64::try_from(search_time.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_results == 0
    }

    /// All results in module order.
    pub fn iter(&self) -> impl Iterator<Item = &SearchResult> {
        self.users
            .iter()
            .chain(&self.files)
            .chain(&self.companies)
            .chain(&self.contacts)
            .chain(&self.payment_methods)
    }
}

/// The user performing a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub id: String,
    pub role: Role,
}

impl CallerIdentity {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// Caller identity plus tuning values for one search.
///
/// Identity fields are optional here so that a missing one is reported as
/// [`SearchError::MissingUserInfo`] instead of being impossible to express.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub user_id: Option<String>,
    pub user_role: Option<String>,
    /// Maximum results per module
    pub limit: usize,
    pub min_query_length: usize,
    /// Typing pause before a session fires a search
    pub debounce: Duration,
    /// Sort each module's results by relevance to the query
    pub rank: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            user_id: None,
            user_role: None,
            limit: 5,
            min_query_length: 3,
            debounce: Duration::from_millis(500),
            rank: false,
        }
    }
}

impl SearchOptions {
    pub fn for_caller(user_id: impl Into<String>, user_role: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            user_role: Some(user_role.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_min_query_length(mut self, min_query_length: usize) -> Self {
        self.min_query_length = min_query_length;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_ranking(mut self, rank: bool) -> Self {
        self.rank = rank;
        self
    }

    /// Resolve the caller, treating blank values as missing.
    pub fn caller(&self) -> Result<CallerIdentity, SearchError> {
        let id = self
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());
        let role = self
            .user_role
            .as_deref()
            .map(str::trim)
            .filter(|role| !role.is_empty());

        match (id, role) {
            (Some(id), Some(role)) => Ok(CallerIdentity::new(id, Role::from(role))),
            _ => Err(SearchError::MissingUserInfo),
        }
    }
}

/// A portal user row.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub second_last_name: Option<String>,
    pub email: String,
    pub username: Option<String>,
    /// National ID
    pub rut: Option<String>,
    pub role: String,
    pub is_active: bool,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.last_name.as_deref(),
            self.second_last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StorageItemKind {
    File,
    Folder,
}

/// A file or folder in the storage browser.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageItemRecord {
    pub id: String,
    pub name: String,
    pub kind: StorageItemKind,
    /// Full path of the item itself
    pub path: String,
    /// Path of the folder containing the item ("/" for the root)
    pub parent_path: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
}

impl StorageItemRecord {
    pub fn is_folder(&self) -> bool {
        self.kind == StorageItemKind::Folder
    }

    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        (!stem.is_empty() && !ext.is_empty()).then_some(ext)
    }
}

/// An insurance-assistance company.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRecord {
    pub id: String,
    pub name: String,
    pub rut: Option<String>,
    pub is_active: bool,
}

/// A contact person attached to a company.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactRecord {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
}

/// A company's bank payment method, joined with the company name.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethodRecord {
    pub id: String,
    pub company_id: String,
    pub company_name: String,
    pub tax_id: Option<String>,
    pub bank_name: Option<String>,
    pub account_type: Option<String>,
    pub account_number: Option<String>,
    pub is_active: bool,
}
