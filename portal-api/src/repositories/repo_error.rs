use portal_search::DirectoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

impl From<RepositoryError> for DirectoryError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DatabaseError(e) => DirectoryError::DatabaseError(e.to_string()),
            RepositoryError::InvalidRow(msg) => DirectoryError::Other(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_keep_their_kind() {
        let err = DirectoryError::from(RepositoryError::from(sqlx::Error::RowNotFound));
        assert!(matches!(err, DirectoryError::DatabaseError(_)));

        let err = DirectoryError::from(RepositoryError::InvalidRow("bad kind".into()));
        assert!(matches!(err, DirectoryError::Other(ref msg) if msg == "bad kind"));
    }
}
