//! RamUnitOfWork - snapshot-based unit of work held entirely in memory.

use super::{NewEvents, Repositories, UnitOfWork, UowError};

/// Unit of work over two generations of repositories: the working state the
/// handlers mutate and the last committed state.
///
/// Commit snapshots working into committed; rollback snapshots committed back
/// into working. Snapshots share unchanged entities with the state they were
/// taken from.
#[derive(Clone, Debug, Default)]
pub struct RamUnitOfWork {
    working: Repositories,
    committed: Repositories,
}

impl RamUnitOfWork {
    /// Take ownership of the repositories; their current contents become the
    /// first committed state.
    pub fn new(repositories: Repositories) -> Self {
        RamUnitOfWork {
            committed: repositories.clone(),
            working: repositories,
        }
    }

    /// The last committed generation.
    pub fn committed(&self) -> &Repositories {
        &self.committed
    }
}

impl UnitOfWork for RamUnitOfWork {
    fn repositories(&self) -> &Repositories {
        &self.working
    }

    fn repositories_mut(&mut self) -> &mut Repositories {
        &mut self.working
    }

    fn commit_changes(&mut self) -> Result<(), UowError> {
        self.committed = self.working.clone();
        tracing::debug!(repositories = self.committed.len(), "committed working state");
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), UowError> {
        self.working = self.committed.clone();
        tracing::debug!(repositories = self.working.len(), "rolled back to committed state");
        Ok(())
    }

    fn collect_new_events(&mut self) -> NewEvents<'_> {
        NewEvents::with_baseline(&mut self.working, &mut self.committed)
    }
}
