//! Tests for the store-and-subscribe context.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use formguard::Context;

#[test]
fn test_get_returns_current_value() {
    let ctx = Context::new(41u32);
    assert_eq!(ctx.get(), 41);
}

#[test]
fn test_publish_replaces_value() {
    let ctx = Context::new(0u32);
    ctx.publish(7);
    assert_eq!(ctx.get(), 7);
}

#[test]
fn test_clone_shares_value() {
    let ctx = Context::new(String::from("a"));
    let other = ctx.clone();
    other.publish(String::from("b"));
    assert_eq!(ctx.get(), "b");
}

#[test]
fn test_subscriber_notified_synchronously() {
    let ctx = Context::new(0usize);
    let seen = Arc::new(AtomicUsize::new(0));

    let probe = Arc::clone(&seen);
    let _sub = ctx.subscribe(move |value| probe.store(*value, Ordering::SeqCst));

    ctx.publish(7);
    assert_eq!(seen.load(Ordering::SeqCst), 7);
}

#[test]
fn test_multiple_subscribers_all_notified() {
    let ctx = Context::new(0usize);
    let count = Arc::new(AtomicUsize::new(0));

    let a = Arc::clone(&count);
    let _sub_a = ctx.subscribe(move |_| {
        a.fetch_add(1, Ordering::SeqCst);
    });
    let b = Arc::clone(&count);
    let _sub_b = ctx.subscribe(move |_| {
        b.fetch_add(1, Ordering::SeqCst);
    });

    ctx.publish(1);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_drop_subscription_stops_notifications() {
    let ctx = Context::new(0usize);
    let count = Arc::new(AtomicUsize::new(0));

    let probe = Arc::clone(&count);
    let sub = ctx.subscribe(move |_| {
        probe.fetch_add(1, Ordering::SeqCst);
    });

    ctx.publish(1);
    drop(sub);
    ctx.publish(2);

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_subscriber_can_read_context_reentrantly() {
    let ctx = Context::new(0usize);
    let seen = Arc::new(AtomicUsize::new(0));

    let inner_ctx = ctx.clone();
    let probe = Arc::clone(&seen);
    let _sub = ctx.subscribe(move |_| probe.store(inner_ctx.get(), Ordering::SeqCst));

    ctx.publish(9);
    assert_eq!(seen.load(Ordering::SeqCst), 9);
}
