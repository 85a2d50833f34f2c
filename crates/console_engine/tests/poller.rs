use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use console_engine::Poller;

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

fn counting_poller(interval: Duration) -> (Poller, Arc<AtomicUsize>) {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();
    let mut poller = Poller::new();
    poller.arm(interval, move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (poller, ticks)
}

#[tokio::test(start_paused = true)]
async fn first_tick_is_immediate_then_periodic() {
    let (_poller, ticks) = counting_poller(Duration::from_secs(5));
    settle().await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(ticks.load(Ordering::SeqCst), 2);

    tokio::time::advance(Duration::from_secs(10)).await;
    settle().await;
    assert!(ticks.load(Ordering::SeqCst) >= 3);
}

#[tokio::test(start_paused = true)]
async fn disarm_stops_ticks() {
    let (mut poller, ticks) = counting_poller(Duration::from_secs(1));
    settle().await;
    poller.disarm();
    poller.disarm();
    assert!(!poller.is_armed());
    let seen = ticks.load(Ordering::SeqCst);

    tokio::time::advance(Duration::from_secs(10)).await;
    settle().await;
    assert_eq!(ticks.load(Ordering::SeqCst), seen);
}

#[tokio::test(start_paused = true)]
async fn rearming_replaces_previous_timer() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let mut poller = Poller::new();

    let counter = first.clone();
    poller.arm(Duration::from_secs(1), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    settle().await;
    let counter = second.clone();
    poller.arm(Duration::from_secs(1), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    settle().await;
    let first_seen = first.load(Ordering::SeqCst);

    tokio::time::advance(Duration::from_secs(3)).await;
    settle().await;
    assert_eq!(first.load(Ordering::SeqCst), first_seen);
    assert!(second.load(Ordering::SeqCst) >= 2);
    assert!(poller.is_armed());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_poller_disarms_it() {
    let (poller, ticks) = counting_poller(Duration::from_secs(1));
    settle().await;
    drop(poller);
    let seen = ticks.load(Ordering::SeqCst);

    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(ticks.load(Ordering::SeqCst), seen);
}
