use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;

use super::DependencyError;
use crate::unit_of_work::Uow;

/// Values available for injection, keyed by type.
#[derive(Default)]
pub struct Dependencies {
    values: HashMap<TypeId, (&'static str, Box<dyn Any>)>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value. Returns `self` for chaining.
    pub fn with<T: Clone + 'static>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Register a value, replacing any earlier value of the same type.
    pub fn insert<T: Clone + 'static>(&mut self, value: T) {
        self.values
            .insert(TypeId::of::<T>(), (type_name::<T>(), Box::new(value)));
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|(_, value)| value.downcast_ref::<T>())
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    /// Resolve whatever a handler declared.
    pub fn resolve<D: FromDependencies>(&self) -> Result<D, DependencyError> {
        D::from_dependencies(self)
    }

    fn cloned<T: Clone + 'static>(&self) -> Result<T, DependencyError> {
        self.get::<T>()
            .cloned()
            .ok_or(DependencyError::Missing(type_name::<T>()))
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.values.values().map(|(name, _)| name))
            .finish()
    }
}

/// What a handler declares as its second parameter.
///
/// Implemented for `()` (nothing), [`Uow`], [`Dep<T>`], and tuples of up to
/// four of those.
pub trait FromDependencies: Sized {
    fn from_dependencies(dependencies: &Dependencies) -> Result<Self, DependencyError>;
}

impl FromDependencies for () {
    fn from_dependencies(_: &Dependencies) -> Result<Self, DependencyError> {
        Ok(())
    }
}

impl FromDependencies for Uow {
    fn from_dependencies(dependencies: &Dependencies) -> Result<Self, DependencyError> {
        dependencies.cloned::<Uow>()
    }
}

/// Any registered value other than the unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dep<T>(pub T);

impl<T> Dep<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Dep<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Clone + 'static> FromDependencies for Dep<T> {
    fn from_dependencies(dependencies: &Dependencies) -> Result<Self, DependencyError> {
        dependencies.cloned::<T>().map(Dep)
    }
}

macro_rules! impl_from_dependencies_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: FromDependencies),+> FromDependencies for ($($name,)+) {
            fn from_dependencies(dependencies: &Dependencies) -> Result<Self, DependencyError> {
                Ok(($($name::from_dependencies(dependencies)?,)+))
            }
        }
    };
}

impl_from_dependencies_for_tuple!(A);
impl_from_dependencies_for_tuple!(A, B);
impl_from_dependencies_for_tuple!(A, B, C);
impl_from_dependencies_for_tuple!(A, B, C, D);
