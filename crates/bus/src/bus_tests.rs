// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use proptest::prelude::*;
use rstest::rstest;

fn recorder() -> (Arc<Mutex<Vec<String>>>, EventBus<String>) {
    (Arc::new(Mutex::new(Vec::new())), EventBus::new())
}

#[test]
fn test_publish_without_subscribers() {
    let bus: EventBus<u32> = EventBus::new();
    let report = bus.publish("nobody", 1).unwrap();
    assert_eq!(report.delivered, 0);
    assert!(report.is_clean());
    assert_eq!(report.topic, "nobody");
}

#[test]
fn test_subscribers_run_in_registration_order() {
    let (seen, bus) = recorder();
    for tag in ["first", "second", "third"] {
        let seen = Arc::clone(&seen);
        bus.subscribe("greeting", move |payload: &String| {
            seen.lock().push(format!("{}:{}", tag, payload));
            Ok(())
        });
    }

    let report = bus.publish("greeting", "hi".to_string()).unwrap();

    assert_eq!(report.delivered, 3);
    assert_eq!(
        *seen.lock(),
        vec!["first:hi", "second:hi", "third:hi"]
    );
}

#[test]
fn test_topics_are_independent() {
    let (seen, bus) = recorder();
    let s = Arc::clone(&seen);
    bus.topic("a").sub(move |p: &String| {
        s.lock().push(p.clone());
        Ok(())
    });

    bus.publish("b", "ignored".to_string()).unwrap();
    bus.topic("a").publish("kept".to_string()).unwrap();

    assert_eq!(*seen.lock(), vec!["kept"]);
}

#[test]
fn test_late_subscriber_gets_no_replay() {
    let (seen, bus) = recorder();
    bus.publish("t", "early".to_string()).unwrap();

    let s = Arc::clone(&seen);
    bus.subscribe("t", move |p: &String| {
        s.lock().push(p.clone());
        Ok(())
    });
    bus.publish("t", "late".to_string()).unwrap();

    assert_eq!(*seen.lock(), vec!["late"]);
}

#[test]
fn test_failing_subscriber_does_not_block_others() {
    let (seen, bus) = recorder();
    bus.subscribe("t", |_: &String| Err("listener broke".into()));
    let s = Arc::clone(&seen);
    bus.subscribe("t", move |p: &String| {
        s.lock().push(p.clone());
        Ok(())
    });

    let report = bus.publish("t", "payload".to_string()).unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 0);
    assert_eq!(report.failures[0].message, "listener broke");
    assert!(!report.failures[0].panicked);
    assert_eq!(*seen.lock(), vec!["payload"]);
}

#[test]
fn test_panicking_subscriber_is_isolated() {
    let (seen, bus) = recorder();
    bus.subscribe("t", |_: &String| panic!("boom"));
    let s = Arc::clone(&seen);
    bus.subscribe("t", move |p: &String| {
        s.lock().push(p.clone());
        Ok(())
    });

    let report = bus.publish("t", "after panic".to_string()).unwrap();

    assert_eq!(report.invoked(), 2);
    assert!(report.failures[0].panicked);
    assert_eq!(report.failures[0].message, "boom");
    assert_eq!(*seen.lock(), vec!["after panic"]);
    assert!(!bus.is_dispatching("t"));
}

#[test]
fn test_reentrant_publish_same_topic_rejected() {
    let bus: EventBus<u32> = EventBus::new();
    let outcome = Arc::new(Mutex::new(None));

    let inner_bus = bus.clone();
    let o = Arc::clone(&outcome);
    bus.subscribe("loop", move |n: &u32| {
        *o.lock() = Some(inner_bus.publish("loop", n + 1));
        Ok(())
    });

    bus.publish("loop", 0).unwrap();

    let nested = outcome.lock().clone().unwrap();
    assert_eq!(
        nested,
        Err(BusError::Reentrant {
            topic: "loop".to_string()
        })
    );
}

#[test]
fn test_publish_other_topic_from_subscriber() {
    let bus: EventBus<u32> = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let s = Arc::clone(&seen);
    bus.subscribe("second", move |n: &u32| {
        s.lock().push(*n);
        Ok(())
    });
    let inner_bus = bus.clone();
    bus.subscribe("first", move |n: &u32| {
        inner_bus.publish("second", n * 10)?;
        Ok(())
    });

    bus.publish("first", 4).unwrap();
    assert_eq!(*seen.lock(), vec![40]);
}

#[test]
fn test_subscribe_during_dispatch_applies_next_publish() {
    let bus: EventBus<u32> = EventBus::new();
    let count = Arc::new(Mutex::new(0));

    let inner_bus = bus.clone();
    let c = Arc::clone(&count);
    bus.subscribe("grow", move |_: &u32| {
        let c = Arc::clone(&c);
        inner_bus.subscribe("grow", move |_: &u32| {
            *c.lock() += 1;
            Ok(())
        });
        Ok(())
    });

    let first = bus.publish("grow", 0).unwrap();
    assert_eq!(first.delivered, 1);
    assert_eq!(*count.lock(), 0);

    let second = bus.publish("grow", 0).unwrap();
    assert_eq!(second.delivered, 2);
    assert_eq!(*count.lock(), 1);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(5)]
fn test_subscriber_count(#[case] n: usize) {
    let bus: EventBus<()> = EventBus::new();
    for _ in 0..n {
        bus.subscribe("counted", |_: &()| Ok(()));
    }
    assert_eq!(bus.subscriber_count("counted"), n);
    assert_eq!(bus.topic("counted").subscriber_count(), n);
}

#[test]
fn test_topics_listing_and_clear() {
    let bus: EventBus<()> = EventBus::new();
    bus.subscribe("run requested", |_: &()| Ok(()));
    bus.subscribe("new test group", |_: &()| Ok(()));

    assert_eq!(bus.topics(), vec!["new test group", "run requested"]);

    bus.clear();
    assert!(bus.topics().is_empty());
    assert_eq!(bus.publish("run requested", ()).unwrap().delivered, 0);
}

#[test]
fn test_clones_share_registry() {
    let bus: EventBus<()> = EventBus::new();
    let other = bus.clone();
    other.subscribe("shared", |_: &()| Ok(()));
    assert_eq!(bus.subscriber_count("shared"), 1);
}

#[test]
fn test_weak_handle_follows_registry_lifetime() {
    let bus: EventBus<()> = EventBus::new();
    let weak = bus.downgrade();
    weak.upgrade().unwrap().subscribe("t", |_: &()| Ok(()));
    assert_eq!(bus.subscriber_count("t"), 1);

    drop(bus);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_panic_message_variants() {
    let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
    let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
    let other: Box<dyn Any + Send> = Box::new(42u8);

    assert_eq!(panic_message(owned.as_ref()), "owned");
    assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
    assert_eq!(panic_message(other.as_ref()), "Unknown panic");
}

proptest! {
    #[test]
    fn prop_every_payload_reaches_every_subscriber(
        subscribers in 1usize..6,
        payloads in proptest::collection::vec(any::<u16>(), 0..8),
    ) {
        let bus: EventBus<u16> = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for id in 0..subscribers {
            let s = Arc::clone(&seen);
            bus.subscribe("p", move |v: &u16| {
                s.lock().push((id, *v));
                Ok(())
            });
        }

        for p in &payloads {
            bus.publish("p", *p).unwrap();
        }

        let expected: Vec<(usize, u16)> = payloads
            .iter()
            .flat_map(|p| (0..subscribers).map(move |id| (id, *p)))
            .collect();
        prop_assert_eq!(seen.lock().clone(), expected);
    }
}
