use std::iter::FusedIterator;

use super::Repositories;
use crate::message::Event;

/// Iterator returned by [`UnitOfWork::collect_new_events`](super::UnitOfWork::collect_new_events).
///
/// Each call to `next` pops one event, so stopping early leaves the rest
/// pending for a later collection. When a baseline generation is attached,
/// every working repository the iterator moves past also has its baseline
/// queues cleared, so restoring the baseline cannot bring collected events
/// back.
pub struct NewEvents<'a> {
    working: &'a mut Repositories,
    baseline: Option<&'a mut Repositories>,
    position: usize,
}

impl<'a> NewEvents<'a> {
    pub(crate) fn new(working: &'a mut Repositories) -> Self {
        NewEvents {
            working,
            baseline: None,
            position: 0,
        }
    }

    pub(crate) fn with_baseline(
        working: &'a mut Repositories,
        baseline: &'a mut Repositories,
    ) -> Self {
        NewEvents {
            working,
            baseline: Some(baseline),
            position: 0,
        }
    }
}

impl Iterator for NewEvents<'_> {
    type Item = Box<dyn Event>;

    fn next(&mut self) -> Option<Box<dyn Event>> {
        while let Some(repository) = self.working.at_mut(self.position) {
            if let Some(event) = repository.pop_pending_event() {
                tracing::trace!(event = event.event_name(), "collected event");
                return Some(event);
            }
            if let Some(baseline) = self.baseline.as_deref_mut() {
                if let Some(repository) = baseline.at_mut(self.position) {
                    repository.discard_pending_events();
                }
            }
            self.position += 1;
        }
        None
    }
}

impl FusedIterator for NewEvents<'_> {}
