// Session Tests Module
// Tests for call, recording and compose sessions and their timers

mod chat_session_tests;
mod compose_tests;
mod recording_tests;
mod timer_tests;

use std::time::Duration;

/// Let paused time run forward, firing every timer due in between
pub(super) async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
