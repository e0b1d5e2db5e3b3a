//! Unit tests for the binder's registration surface
use std::sync::Arc;

use bind::*;

#[derive(Debug, Default)]
struct TestService {
    value: i32,
}

impl Component for TestService {}

#[test]
fn test_add_nothing() {
    let mut binder = Binder::new();

    binder.add(items![]).unwrap();
    binder.add(Vec::new()).unwrap();

    assert!(binder.is_empty());
}

#[test]
fn test_add_and_keep_identity() {
    let mut binder = Binder::new();
    let service = handle(TestService { value: 42 });

    binder.add_one(service.clone()).unwrap();

    assert_eq!(binder.len(), 1);
    assert!(binder.contains::<TestService>());
    assert!(!binder.contains::<Logger>());

    // The binder holds the same instance, not a copy
    service.write().unwrap().value = 7;
    assert_eq!(service.read().unwrap().value, 7);
    assert_eq!(Arc::strong_count(&service), 2);
}

#[test]
fn test_non_pointer_rejected() {
    let mut binder = Binder::new();

    let err = binder.add(items![1_i32]).unwrap_err();
    assert!(err
        .to_string()
        .contains("cannot bind non-pointer type i32, all items must be pointers"));
    assert!(matches!(err, BindError::NotPointer { type_name: "i32" }));
    assert!(binder.is_empty());
}

#[test]
fn test_nil_rejected() {
    let mut binder = Binder::new();

    let err = binder.add(items![Nil]).unwrap_err();
    assert!(matches!(err, BindError::NilValue));
    assert_eq!(err.to_string(), "cannot bind nil value");

    let missing: Option<Handle<TestService>> = None;
    let err = binder.add_one(missing).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("nil pointer"));
    assert!(message.contains("TestService"));
}

#[test]
fn test_failure_stops_processing() {
    let mut binder = Binder::new();
    let first = handle(TestService { value: 1 });
    let last = handle(TestService { value: 3 });

    let result = binder.add(items![first.clone(), 2_u64, last.clone()]);

    assert!(matches!(result, Err(BindError::NotPointer { .. })));
    // `first` stays registered, `last` was never looked at
    assert_eq!(binder.len(), 1);
    assert_eq!(Arc::strong_count(&first), 2);
    assert_eq!(Arc::strong_count(&last), 1);
}

#[test]
fn test_some_handle_accepted() {
    let mut binder = Binder::new();
    binder
        .add_one(Some(handle(TestService::default())))
        .unwrap();
    assert!(binder.contains::<TestService>());
}

#[test]
fn test_builder_pattern() {
    let service = handle(TestService { value: 42 });
    let binder = BinderBuilder::new()
        .add(items![service.clone()])
        .unwrap()
        .build();

    assert_eq!(binder.len(), 1);
    assert!(binder.logger().is_discarding());
    assert_eq!(service.read().unwrap().value, 42);
}
