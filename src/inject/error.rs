#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DependencyError {
    /// A handler declared a dependency nobody registered.
    #[error("missing dependency: {0}")]
    Missing(&'static str),
}
