// End-to-end tests for the broadcast core: store mutations fan out through
// the hub into per-subscriber mailboxes, independent of any transport.

use serde_json::{json, Value};
use std::sync::Arc;
use worldsync::broadcast::BroadcastHub;
use worldsync::subscription::session::{apply_inbound, enqueue_snapshot};
use worldsync::world::WorldStore;

fn wired() -> (Arc<WorldStore>, Arc<BroadcastHub>) {
    let store = Arc::new(WorldStore::new());
    let hub = Arc::new(BroadcastHub::new());
    store.add_listener(hub.clone());
    (store, hub)
}

fn parse(frame: &str) -> Value {
    serde_json::from_str(frame).unwrap()
}

#[test]
fn test_subscriber_receives_every_mutation_in_order() {
    let (store, hub) = wired();
    let mut handle = hub.attach();

    store.set("x", "score", json!(1));
    store.set("x", "score", json!(2));

    assert_eq!(
        parse(&handle.mailbox.try_recv().unwrap()),
        json!({"x": {"score": 1}})
    );
    assert_eq!(
        parse(&handle.mailbox.try_recv().unwrap()),
        json!({"x": {"score": 2}})
    );
    assert!(handle.mailbox.try_recv().is_none());
}

#[test]
fn test_two_subscribers_both_receive_all_events() {
    let (store, hub) = wired();
    let mut first = hub.attach();
    let mut second = hub.attach();

    store.set("x", "a", json!(1));
    store.replace("y", [("b".to_string(), json!(2))].into_iter().collect());

    for handle in [&mut first, &mut second] {
        let mut frames = Vec::new();
        while let Some(frame) = handle.mailbox.try_recv() {
            frames.push(parse(&frame));
        }
        assert_eq!(
            frames,
            vec![json!({"x": {"a": 1}}), json!({"y": {"b": 2}})]
        );
    }
}

#[test]
fn test_detaching_one_subscriber_does_not_drop_events_for_other() {
    let (store, hub) = wired();
    let mut kept = hub.attach();
    let gone = hub.attach();

    store.set("x", "a", json!(1));
    hub.detach(&gone.id);
    drop(gone.mailbox);
    store.set("x", "a", json!(2));

    assert_eq!(parse(&kept.mailbox.try_recv().unwrap()), json!({"x": {"a": 1}}));
    assert_eq!(parse(&kept.mailbox.try_recv().unwrap()), json!({"x": {"a": 2}}));
}

#[test]
fn test_late_subscriber_gets_snapshot_then_live_events() {
    let (store, hub) = wired();
    store.set("a", "v", json!(1));
    store.set("b", "v", json!(2));

    let mut handle = hub.attach();
    enqueue_snapshot(&handle.sender, &store).unwrap();
    store.set("c", "v", json!(3));

    let mut frames = Vec::new();
    while let Some(frame) = handle.mailbox.try_recv() {
        frames.push(parse(&frame));
    }
    assert_eq!(frames.len(), 3);

    // Exactly one snapshot frame per pre-existing entity, before the live one
    let mut snapshot_ids: Vec<String> = frames[..2]
        .iter()
        .map(|f| f.as_object().unwrap().keys().next().unwrap().clone())
        .collect();
    snapshot_ids.sort();
    assert_eq!(snapshot_ids, vec!["a", "b"]);
    assert_eq!(frames[2], json!({"c": {"v": 3}}));
}

#[test]
fn test_inbound_frame_fans_out_to_other_subscribers() {
    let (store, hub) = wired();
    let mut observer = hub.attach();

    // What a session does with an inbound text frame
    apply_inbound(&store, r#"{"x":{"score":1},"y":{"score":2}}"#);

    let mut frames = Vec::new();
    while let Some(frame) = observer.mailbox.try_recv() {
        frames.push(parse(&frame));
    }
    assert_eq!(frames.len(), 2);
    for frame in &frames {
        assert_eq!(frame.as_object().unwrap().len(), 1);
    }
}

#[test]
fn test_malformed_inbound_reaches_no_subscriber() {
    let (store, hub) = wired();
    let mut observer = hub.attach();

    apply_inbound(&store, "garbage");

    assert!(observer.mailbox.try_recv().is_none());
    assert_eq!(store.entity_count(), 0);
}

#[test]
fn test_clear_emits_nothing() {
    let (store, hub) = wired();
    let mut handle = hub.attach();

    store.set("x", "score", json!(2));
    let _ = handle.mailbox.try_recv();

    store.clear();

    assert!(handle.mailbox.try_recv().is_none());
    assert!(store.snapshot().is_empty());
}

#[test]
fn test_stalled_subscriber_does_not_delay_writer_or_peers() {
    let (store, hub) = wired();
    let mut stalled = hub.attach();
    let mut active = hub.attach();

    for i in 0..500 {
        store.set("x", "seq", json!(i));
    }

    let mut active_count = 0;
    while active.mailbox.try_recv().is_some() {
        active_count += 1;
    }
    assert_eq!(active_count, 500);

    // The stalled mailbox buffered everything without blocking anyone
    let mut stalled_count = 0;
    while stalled.mailbox.try_recv().is_some() {
        stalled_count += 1;
    }
    assert_eq!(stalled_count, 500);
}

#[test]
fn test_snapshot_after_clear_is_empty_for_new_subscriber() {
    let (store, hub) = wired();
    store.set("x", "score", json!(2));
    store.clear();

    let mut handle = hub.attach();
    enqueue_snapshot(&handle.sender, &store).unwrap();

    assert!(handle.mailbox.try_recv().is_none());
}
