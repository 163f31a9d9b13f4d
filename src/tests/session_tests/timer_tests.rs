// Timer Tests - Testing cancellable one-shot and periodic timers

use super::advance_ms;
use crate::session::Timer;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_after_fires_once() {
    let fired = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&fired);
    let timer = Timer::after(Duration::from_secs(1), async move {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert!(timer.is_running());

    advance_ms(500).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    advance_ms(5_000).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!timer.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_prevents_firing() {
    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    let mut timer = Timer::after(Duration::from_secs(1), async move {
        flag.store(true, Ordering::SeqCst);
    });

    timer.cancel();
    advance_ms(2_000).await;

    assert!(!fired.load(Ordering::SeqCst));
    assert!(!timer.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels() {
    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    let timer = Timer::after(Duration::from_secs(1), async move {
        flag.store(true, Ordering::SeqCst);
    });

    drop(timer);
    advance_ms(2_000).await;

    assert!(!fired.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_every_ticks_until_false() {
    let ticks = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&ticks);
    let timer = Timer::every(Duration::from_secs(1), move || {
        let counter = Arc::clone(&counter);
        async move { counter.fetch_add(1, Ordering::SeqCst) + 1 < 3 }
    });

    // First tick lands one period after start
    advance_ms(900).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 0);

    advance_ms(10_000).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 3);
    assert!(!timer.is_running());
}

#[test]
fn test_idle_timer() {
    let mut timer = Timer::idle();
    assert!(!timer.is_running());
    timer.cancel();
    assert!(!timer.is_running());
}
