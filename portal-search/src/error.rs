use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Stable codes reported alongside a failed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthenticated,
    MissingUserInfo,
    SearchError,
    SearchException,
    UnknownError,
}

/// Errors that surface from a global search.
///
/// Failures inside a single module never show up here; they degrade to an
/// empty list for that module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("not authenticated")]
    Unauthenticated,
    #[error("user id and role are required to search")]
    MissingUserInfo,
    #[error("search failed: {0}")]
    Search(String),
    #[error("search request failed: {0}")]
    Exception(String),
    #[error("unknown search error")]
    Unknown,
}

impl SearchError {
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthenticated => ErrorCode::Unauthenticated,
            Self::MissingUserInfo => ErrorCode::MissingUserInfo,
            Self::Search(_) => ErrorCode::SearchError,
            Self::Exception(_) => ErrorCode::SearchException,
            Self::Unknown => ErrorCode::UnknownError,
        }
    }
}
