//! End-to-end behaviour of the registry, handles and component bindings

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hookstore::prelude::*;
use hookstore::testing::Recorder;
use hookstore::{assert_not_recorded, assert_recorded, Subscriber};
use serde_json::{json, Value};

fn counter(registry: &StoreRegistry) -> ReducerHandle<i32, i32> {
    registry
        .create_with_reducer("counter", 0, |s: &i32, a: &i32| s + a)
        .expect("fresh registry")
}

#[test]
fn test_created_store_is_found_by_name() {
    let registry = StoreRegistry::new();
    registry.create("settings", json!({ "dark": true })).unwrap();
    registry
        .create_with_reducer("items", vec![1, 2], |s: &Vec<i32>, a: &i32| {
            let mut next = s.clone();
            next.push(*a);
            next
        })
        .unwrap();

    let settings = registry.get_store_by_name::<Value, Value>("settings").unwrap();
    assert_eq!(settings.get_state(), json!({ "dark": true }));

    let items = registry.get_store_by_name::<Vec<i32>, i32>("items").unwrap();
    assert_eq!(items.get_state(), vec![1, 2]);
}

#[test]
fn test_second_create_with_same_name_is_ignored() {
    let registry = StoreRegistry::new();
    let first = counter(&registry);
    let mut recorder = Recorder::<(i32, i32)>::new();
    first.subscribe(recorder.subscriber());
    first.dispatch(2);

    let second = registry.create_with_reducer("counter", 100, |_: &i32, a: &i32| *a);
    assert!(second.is_none());

    first.dispatch(1);
    assert_eq!(first.get_state(), 3);
    assert_eq!(recorder.drain(), vec![(2, 2), (3, 1)]);
}

#[test]
fn test_reducer_store_rejects_set_state() {
    let registry = StoreRegistry::new();
    counter(&registry).dispatch(4);

    let handle = registry.get_store_by_name::<i32, i32>("counter").unwrap();
    handle.dispatch(1);
    handle.set_state(1000);

    assert_eq!(handle.get_state(), 5);
}

#[test]
fn test_direct_store_rejects_dispatch() {
    let registry = StoreRegistry::new();
    registry.create("title", String::from("draft")).unwrap();

    let handle = registry.get_store_by_name::<String, String>("title").unwrap();
    handle.set_state("final".into());
    handle.dispatch("ignored".into());

    assert_eq!(handle.get_state(), "final");
}

#[test]
fn test_duplicate_subscription_notifies_once() {
    let registry = StoreRegistry::new();
    let handle = counter(&registry);
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let callback: Subscriber<i32, i32> = Arc::new(move |_: &i32, _: &i32| {
        c.fetch_add(1, Ordering::SeqCst);
    });

    assert!(handle.subscribe(callback.clone()).is_some());
    assert!(handle.subscribe(callback).is_none());

    handle.dispatch(1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cancelled_subscriber_is_skipped() {
    let registry = StoreRegistry::new();
    let handle = counter(&registry);
    let mut removed = Recorder::<(i32, i32)>::new();
    let mut kept = Recorder::<(i32, i32)>::new();

    let subscription = handle.subscribe(removed.subscriber()).unwrap();
    handle.subscribe(kept.subscriber()).unwrap();

    assert!(subscription.cancel());
    assert!(!subscription.cancel());
    handle.dispatch(7);

    assert!(!removed.has_recorded());
    assert_eq!(kept.drain(), vec![(7, 7)]);
}

#[test]
fn test_component_slot_runs_only_while_bound() {
    let registry = StoreRegistry::new();
    let handle = counter(&registry);
    let mut renders = Recorder::<i32>::new();

    let binding = registry
        .use_store::<i32, i32, _>(&handle, renders.component())
        .unwrap();
    handle.dispatch(1);
    drop(binding);
    handle.dispatch(1);

    assert_eq!(renders.drain(), vec![1]);
}

#[test]
fn test_counter_end_to_end() {
    let registry = StoreRegistry::new();
    let handle = counter(&registry);
    let mut recorder = Recorder::<(i32, i32)>::new();
    handle.subscribe(recorder.subscriber());

    handle.dispatch(5);
    assert_eq!(handle.get_state(), 5);
    handle.dispatch(3);
    assert_eq!(handle.get_state(), 8);

    let updates = recorder.drain();
    assert_eq!(updates, vec![(5, 5), (8, 3)]);
    assert_recorded!(updates, (8, 3));
    assert_not_recorded!(updates, (0, _));
}

#[test]
fn test_user_end_to_end() {
    let registry = StoreRegistry::new();
    let user = registry
        .create("user", json!({ "name": "a" }))
        .unwrap();

    user.set_state(json!({ "name": "b" }));

    assert_eq!(
        registry.read_only_store::<Value, Value>("user").unwrap(),
        json!({ "name": "b" })
    );
}

#[test]
fn test_slots_before_subscribers_before_completion() {
    let registry = StoreRegistry::new();
    let handle = counter(&registry);
    let order = Arc::new(Mutex::new(Vec::new()));

    let o = order.clone();
    handle.subscribe(Arc::new(move |_: &i32, _: &i32| o.lock().unwrap().push("subscriber")));
    let o = order.clone();
    let _binding = registry
        .use_store::<i32, i32, _>("counter", move |_: &i32| o.lock().unwrap().push("component"))
        .unwrap();

    let o = order.clone();
    handle.dispatch_then(1, move |_| o.lock().unwrap().push("completion"));

    assert_eq!(
        *order.lock().unwrap(),
        vec!["component", "subscriber", "completion"]
    );
}

#[test]
fn test_updater_from_binding_works_in_both_modes() {
    let registry = StoreRegistry::new();
    counter(&registry);
    registry.create("flag", false).unwrap();

    let sum = registry
        .use_store::<i32, i32, _>("counter", |_: &i32| {})
        .unwrap();
    let flag = registry
        .use_store::<bool, bool, _>("flag", |_: &bool| {})
        .unwrap();

    sum.updater().set_state(2);
    flag.updater().set_state(true);

    assert_eq!(sum.state(), 2);
    assert!(flag.state());
}

#[test]
fn test_lookup_errors() {
    let registry = StoreRegistry::new();
    counter(&registry);

    assert!(matches!(
        registry.read_only_store::<i32, i32>("nope"),
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        registry.read_only_store::<String, String>("counter"),
        Err(StoreError::TypeMismatch { .. })
    ));
}

#[test]
fn test_empty_name_is_a_valid_store_name() {
    let registry = StoreRegistry::new();
    let handle = registry.create("", 1_i32).unwrap();

    handle.set_state(2);
    assert_eq!(registry.read_only_store::<i32, i32>("").unwrap(), 2);
}

#[cfg(feature = "subscriptions")]
#[tokio::test]
async fn test_watch_stream_sees_dispatches() {
    use tokio_stream::StreamExt;

    let registry = StoreRegistry::new();
    let handle = counter(&registry);
    let mut updates = handle.watch();

    handle.dispatch(5);
    handle.dispatch(3);

    assert_eq!(updates.next().await, Some((5, 5)));
    assert_eq!(updates.next().await, Some((8, 3)));
}
