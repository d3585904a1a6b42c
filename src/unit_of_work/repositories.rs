use std::any::type_name;
use std::fmt;

use super::UowError;
use crate::repository::Repository;

/// Ordered mapping of repository name to repository.
///
/// Registration order is the order in which the unit of work harvests
/// events. Cloning snapshots every repository.
#[derive(Clone, Default)]
pub struct Repositories {
    entries: Vec<(String, Box<dyn Repository>)>,
}

impl Repositories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository. Returns `self` for chaining.
    pub fn with<R: Repository>(mut self, name: impl Into<String>, repository: R) -> Self {
        self.insert(name, repository);
        self
    }

    /// Register a repository, replacing one already registered under `name`.
    pub fn insert<R: Repository>(&mut self, name: impl Into<String>, repository: R) {
        let name = name.into();
        let repository: Box<dyn Repository> = Box::new(repository);
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = repository,
            None => self.entries.push((name, repository)),
        }
    }

    pub fn get<R: Repository>(&self, name: &str) -> Result<&R, UowError> {
        let repository = self
            .entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, repository)| repository)
            .ok_or_else(|| UowError::RepositoryNotFound(name.to_string()))?;

        repository
            .as_any()
            .downcast_ref::<R>()
            .ok_or_else(|| UowError::RepositoryTypeMismatch {
                name: name.to_string(),
                expected: type_name::<R>(),
            })
    }

    pub fn get_mut<R: Repository>(&mut self, name: &str) -> Result<&mut R, UowError> {
        let repository = self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing == name)
            .map(|(_, repository)| repository)
            .ok_or_else(|| UowError::RepositoryNotFound(name.to_string()))?;

        repository
            .as_any_mut()
            .downcast_mut::<R>()
            .ok_or_else(|| UowError::RepositoryTypeMismatch {
                name: name.to_string(),
                expected: type_name::<R>(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> Option<&mut dyn Repository> {
        self.entries
            .get_mut(index)
            .map(|(_, repository)| &mut **repository)
    }
}

impl fmt::Debug for Repositories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(name, repository)| (name, repository.repository_name())),
            )
            .finish()
    }
}
