//! Unit of work integration tests.
//!
//! Exercises the RAM unit of work through the public API:
//! - commit/rollback round trips on the sample `objects` repository
//! - scope exits by normal return, error and panic
//! - event collection order and rollback interaction

#[path = "../support/mod.rs"]
mod support;

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use proptest::prelude::*;
use uow_bus::{Event, HandlerError, RamUnitOfWork, UnitOfWork, UnitOfWorkExt, Uow, UowError};

use support::{
    ram_uow, stored, FailingUnitOfWork, Label, Labels, ObjectCreated, ObjectNamed, Objects,
    SampleObject, LABELS, OBJECTS,
};

fn sample() -> SampleObject {
    SampleObject::new("123", "test")
}

fn event_names(uow: &mut RamUnitOfWork) -> Vec<String> {
    uow.collect_new_events()
        .map(|event| describe(&*event))
        .collect()
}

fn describe(event: &dyn Event) -> String {
    if let Some(created) = event.as_any().downcast_ref::<ObjectCreated>() {
        format!("created:{}", created.id)
    } else if let Some(named) = event.as_any().downcast_ref::<ObjectNamed>() {
        format!("named:{}", named.id)
    } else {
        event.event_name().to_string()
    }
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn add_commit_then_delete_commit() {
    let mut uow = ram_uow();

    uow.scoped(|uow| {
        uow.repository_mut::<Objects>(OBJECTS)?.add(sample());
        uow.commit()
    })
    .unwrap();

    uow.scoped(|uow| {
        let objects = uow.repository_mut::<Objects>(OBJECTS)?;
        assert_eq!(objects.get("123"), Some(&sample()));
        objects.delete("123");
        uow.commit()
    })
    .unwrap();

    uow.scoped(|uow| {
        assert_eq!(uow.repository_mut::<Objects>(OBJECTS)?.get("123"), None);
        Ok::<_, UowError>(())
    })
    .unwrap();
}

#[test]
fn add_without_commit_is_discarded() {
    let mut uow = ram_uow();

    uow.scoped(|uow| {
        uow.repository_mut::<Objects>(OBJECTS)?.add(sample());
        Ok::<_, UowError>(())
    })
    .unwrap();

    assert!(uow
        .repository_mut::<Objects>(OBJECTS)
        .unwrap()
        .get("123")
        .is_none());
}

#[test]
fn error_inside_scope_is_rolled_back() {
    let mut uow = ram_uow();

    let suppressed: Result<(), HandlerError> = uow.scoped(|uow| {
        uow.repository_mut::<Objects>(OBJECTS)?.add(sample());
        Err(HandlerError::rejected("test"))
    });

    assert!(matches!(suppressed, Err(HandlerError::Rejected(_))));
    assert!(uow
        .repository_mut::<Objects>(OBJECTS)
        .unwrap()
        .get("123")
        .is_none());
}

#[test]
fn error_after_commit_keeps_committed_state() {
    let mut uow = ram_uow();

    let result: Result<(), HandlerError> = uow.scoped(|uow| {
        uow.repository_mut::<Objects>(OBJECTS)?.add(sample());
        uow.commit()?;
        uow.repository_mut::<Objects>(OBJECTS)?
            .add(SampleObject::new("456", "later"));
        Err(HandlerError::rejected("late failure"))
    });

    assert!(result.is_err());
    let objects = uow.repository::<Objects>(OBJECTS).unwrap();
    assert!(objects.contains("123"));
    assert!(!objects.contains("456"));
}

#[test]
fn panic_inside_scope_is_rolled_back() {
    let mut uow = ram_uow();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut scope = uow.begin();
        scope
            .repository_mut::<Objects>(OBJECTS)
            .unwrap()
            .add(sample());
        panic!("boom");
    }));

    assert!(outcome.is_err());
    assert!(uow.repository::<Objects>(OBJECTS).unwrap().is_empty());
}

#[test]
fn rollback_after_commit_is_a_no_op() {
    let mut uow = ram_uow();
    uow.repository_mut::<Objects>(OBJECTS)
        .unwrap()
        .add(sample());
    uow.commit().unwrap();
    uow.rollback().unwrap();
    uow.rollback().unwrap();

    assert_eq!(
        uow.repository_mut::<Objects>(OBJECTS).unwrap().get("123"),
        Some(&sample())
    );
}

#[test]
fn rollback_failure_after_successful_work_is_returned() {
    let mut uow = FailingUnitOfWork::failing_rollback();

    let result = uow.scoped(|uow| {
        uow.repository_mut::<Objects>(OBJECTS)?.add(sample());
        uow.commit()
    });

    assert!(matches!(
        result,
        Err(UowError::Backend {
            operation: "rollback",
            ..
        })
    ));
    assert!(uow.repository::<Objects>(OBJECTS).unwrap().contains("123"));
}

#[test]
fn rollback_failure_after_failed_work_keeps_the_work_error() {
    let mut uow = FailingUnitOfWork::failing_rollback();

    let result: Result<(), HandlerError> = uow.scoped(|_| Err(HandlerError::rejected("first")));

    assert!(matches!(result, Err(HandlerError::Rejected(ref reason)) if reason == "first"));
}

#[test]
fn commit_failure_is_returned() {
    let mut uow = FailingUnitOfWork::failing_commit();

    let err = uow.commit().unwrap_err();

    assert_eq!(err.to_string(), "unit of work commit failed: disk full");
}

// ============================================================================
// Repository lookup
// ============================================================================

#[test]
fn unregistered_repository_is_not_found() {
    let uow = ram_uow();
    let err = uow.repository::<Objects>("widgets").unwrap_err();

    assert!(matches!(err, UowError::RepositoryNotFound(ref name) if name == "widgets"));
    assert_eq!(
        err.to_string(),
        "repository not found in unit of work: widgets"
    );
}

#[test]
fn repository_of_another_type_is_a_mismatch() {
    let uow = ram_uow();
    assert!(matches!(
        uow.repository::<Labels>(OBJECTS),
        Err(UowError::RepositoryTypeMismatch { .. })
    ));
}

#[test]
fn registration_order_is_kept() {
    let uow = ram_uow();
    let names: Vec<&str> = uow.repositories().names().collect();
    assert_eq!(names, vec![OBJECTS, LABELS]);
}

// ============================================================================
// Event collection
// ============================================================================

#[test]
fn collects_events_in_entity_order() {
    let mut uow = ram_uow();
    let objects = uow.repository_mut::<Objects>(OBJECTS).unwrap();
    objects.add(SampleObject::create("b", "bee"));
    objects.add(SampleObject::create("a", "ay"));
    uow.repository_mut::<Labels>(LABELS).unwrap().add(Label {
        id: 1,
        text: "quiet".into(),
    });

    assert_eq!(
        event_names(&mut uow),
        vec!["created:b", "named:b", "created:a", "named:a"]
    );
    assert!(event_names(&mut uow).is_empty());
}

#[test]
fn partial_collection_leaves_the_rest_pending() {
    let mut uow = ram_uow();
    uow.repository_mut::<Objects>(OBJECTS)
        .unwrap()
        .add(SampleObject::create("1", "one"));

    let first = uow.collect_new_events().next().map(|event| describe(&*event));
    assert_eq!(first.as_deref(), Some("created:1"));
    assert_eq!(event_names(&mut uow), vec!["named:1"]);
}

#[test]
fn collected_events_are_not_resurrected_by_rollback() {
    let mut uow = ram_uow();
    uow.repository_mut::<Objects>(OBJECTS)
        .unwrap()
        .add(SampleObject::create("1", "one"));
    uow.commit().unwrap();

    assert_eq!(event_names(&mut uow).len(), 2);
    uow.rollback().unwrap();

    assert!(event_names(&mut uow).is_empty());
    let objects = uow.repository_mut::<Objects>(OBJECTS).unwrap();
    assert_eq!(objects.get("1").unwrap().pending_events(), 0);
}

// ============================================================================
// Shared handle
// ============================================================================

#[test]
fn shared_handle_scopes_commit_and_rollback() {
    let uow = Uow::new(ram_uow());

    uow.scoped(|uow| {
        uow.repository_mut::<Objects>(OBJECTS)?.add(sample());
        uow.commit()
    })
    .unwrap();

    let discarded: Result<(), UowError> = uow.scoped(|uow| {
        uow.repository_mut::<Objects>(OBJECTS)?
            .add(SampleObject::new("456", "temp"));
        Ok(())
    });

    discarded.unwrap();
    assert_eq!(stored(&uow, "123"), Some(sample()));
    assert_eq!(stored(&uow, "456"), None);
}

#[test]
fn shared_handle_rejects_reentrant_borrow() {
    let uow = Uow::new(ram_uow());
    let inner = uow.clone();

    let result: Result<(), UowError> = uow.scoped(|_| inner.scoped(|_| Ok(())));
    assert!(matches!(result, Err(UowError::InUse)));
}

// ============================================================================
// Properties
// ============================================================================

#[derive(Debug, Clone)]
enum Step {
    Add(String, String),
    Delete(String),
    Commit,
    Rollback,
    FailInScope(String),
}

fn step() -> impl Strategy<Value = Step> {
    let id = "[a-e]";
    prop_oneof![
        (id, "[a-z]{1,4}").prop_map(|(id, name)| Step::Add(id, name)),
        id.prop_map(Step::Delete),
        Just(Step::Commit),
        Just(Step::Rollback),
        id.prop_map(Step::FailInScope),
    ]
}

/// Expected contents of the working and committed generations.
#[derive(Debug, Default)]
struct Model {
    working: BTreeMap<String, String>,
    committed: BTreeMap<String, String>,
}

impl Model {
    fn apply(&mut self, uow: &mut RamUnitOfWork, step: &Step) {
        match step {
            Step::Add(id, name) => {
                uow.repository_mut::<Objects>(OBJECTS)
                    .unwrap()
                    .add(SampleObject::new(id, name));
                self.working.insert(id.clone(), name.clone());
            }
            Step::Delete(id) => {
                uow.repository_mut::<Objects>(OBJECTS)
                    .unwrap()
                    .delete(id.as_str());
                self.working.remove(id);
            }
            Step::Commit => {
                uow.commit().unwrap();
                self.committed = self.working.clone();
            }
            Step::Rollback => {
                uow.rollback().unwrap();
                self.working = self.committed.clone();
            }
            Step::FailInScope(id) => {
                let result: Result<(), HandlerError> = uow.scoped(|uow| {
                    uow.repository_mut::<Objects>(OBJECTS)?
                        .add(SampleObject::new(id, "scoped"));
                    Err(HandlerError::rejected("abandoned"))
                });
                assert!(result.is_err());
                self.working = self.committed.clone();
            }
        }
    }
}

fn contents(objects: &Objects) -> BTreeMap<String, String> {
    objects
        .iter()
        .map(|object| (object.id.clone(), object.name.clone()))
        .collect()
}

proptest! {
    #[test]
    fn generations_follow_the_model(steps in prop::collection::vec(step(), 0..40)) {
        let mut uow = ram_uow();
        let mut model = Model::default();

        for step in &steps {
            model.apply(&mut uow, step);
            prop_assert_eq!(
                contents(uow.repository::<Objects>(OBJECTS).unwrap()),
                model.working.clone()
            );
            prop_assert_eq!(
                contents(uow.committed().get::<Objects>(OBJECTS).unwrap()),
                model.committed.clone()
            );
        }

        uow.rollback().unwrap();
        prop_assert_eq!(contents(uow.repository::<Objects>(OBJECTS).unwrap()), model.committed);
    }

    #[test]
    fn events_follow_first_encounter_order(ids in prop::collection::vec("[a-e]", 0..12)) {
        let mut uow = ram_uow();
        let mut expected = Vec::new();
        for id in &ids {
            if !expected.contains(&format!("created:{id}")) {
                expected.push(format!("created:{id}"));
                expected.push(format!("named:{id}"));
            }
            uow.repository_mut::<Objects>(OBJECTS)
                .unwrap()
                .add(SampleObject::create(id, "x"));
        }

        prop_assert_eq!(event_names(&mut uow), expected);
        prop_assert!(event_names(&mut uow).is_empty());
    }
}
