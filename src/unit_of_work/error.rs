use std::error::Error;

#[derive(Debug, thiserror::Error)]
pub enum UowError {
    /// No repository registered under this name.
    #[error("repository not found in unit of work: {0}")]
    RepositoryNotFound(String),
    /// A repository exists under this name, but not of the requested type.
    #[error("repository {name} is not a {expected}")]
    RepositoryTypeMismatch { name: String, expected: &'static str },
    /// The shared unit of work is already borrowed further up the stack.
    #[error("unit of work is already in use")]
    InUse,
    /// The backend failed to commit or roll back.
    #[error("unit of work {operation} failed: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl UowError {
    pub fn backend(
        operation: &'static str,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        UowError::Backend {
            operation,
            source: source.into(),
        }
    }
}
