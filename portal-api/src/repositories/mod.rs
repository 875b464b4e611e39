mod repo_error;

pub use repo_error::RepositoryError;
