//! Call session state machine
//!
//! `idle -> calling -> connected -> idle`. The calling to connected step fires
//! on its own after the configured setup delay; while connected a periodic
//! tick advances the elapsed counter. Mute and video-off never affect phase.

use crate::session::timer::{run_periodic, Timer};
use crate::storage::Settings;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Call phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallPhase {
    /// No call
    #[default]
    Idle,
    /// Ringing, waiting for the other side
    Calling,
    /// Call established
    Connected,
}

/// Audio-only or video call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallMedium {
    /// Voice call
    #[default]
    Audio,
    /// Video call
    Video,
}

/// Pure call state, advanced by [`CallSession`] or directly in tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallState {
    /// Current phase
    pub phase: CallPhase,
    /// Medium of the current call
    pub medium: CallMedium,
    /// Seconds since the call connected
    pub elapsed_secs: u32,
    /// Microphone muted
    pub muted: bool,
    /// Camera turned off
    pub video_off: bool,
}

impl CallState {
    /// Begin calling. Only valid from idle.
    pub fn start(&mut self, medium: CallMedium) -> bool {
        if self.phase != CallPhase::Idle {
            return false;
        }
        *self = Self {
            phase: CallPhase::Calling,
            medium,
            ..Self::default()
        };
        true
    }

    /// Mark the call as connected. Only valid while calling.
    pub fn connect(&mut self) -> bool {
        if self.phase != CallPhase::Calling {
            return false;
        }
        self.phase = CallPhase::Connected;
        self.elapsed_secs = 0;
        true
    }

    /// Advance the elapsed counter. Ignored unless connected.
    pub fn tick(&mut self) -> bool {
        if self.phase != CallPhase::Connected {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        true
    }

    /// Hang up from any non-idle phase, discarding the counter
    pub fn end(&mut self) -> bool {
        if self.phase == CallPhase::Idle {
            return false;
        }
        *self = Self::default();
        true
    }

    /// Flip the mute flag, returning the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Flip the video-off flag, returning the new value
    pub fn toggle_video(&mut self) -> bool {
        self.video_off = !self.video_off;
        self.video_off
    }
}

/// Timer-driven call session
///
/// Dropping the session cancels its pending connect and tick timers.
#[derive(Debug)]
pub struct CallSession {
    state: Arc<Mutex<CallState>>,
    driver: Timer,
    connect_delay: Duration,
    tick_interval: Duration,
}

impl CallSession {
    /// Create an idle session using the configured delays
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: Arc::new(Mutex::new(CallState::default())),
            driver: Timer::idle(),
            connect_delay: settings.call_connect_delay(),
            tick_interval: settings.tick_interval(),
        }
    }

    /// Place a call
    ///
    /// # Returns
    /// False if a call is already in progress
    pub async fn start(&mut self, medium: CallMedium) -> bool {
        if !self.state.lock().await.start(medium) {
            return false;
        }
        tracing::info!("Calling ({:?})", medium);

        let state = Arc::clone(&self.state);
        let (delay, period) = (self.connect_delay, self.tick_interval);
        self.driver = Timer::spawn(async move {
            tokio::time::sleep(delay).await;
            if !state.lock().await.connect() {
                return;
            }
            tracing::info!("Call connected");
            run_periodic(period, || {
                let state = Arc::clone(&state);
                async move { state.lock().await.tick() }
            })
            .await;
        });
        true
    }

    /// Hang up and stop all timers
    ///
    /// # Returns
    /// False if there was no call
    pub async fn end(&mut self) -> bool {
        self.driver.cancel();
        let mut state = self.state.lock().await;
        let elapsed = state.elapsed_secs;
        let ended = state.end();
        if ended {
            tracing::info!("Call ended after {}s", elapsed);
        }
        ended
    }

    /// Current phase
    pub async fn phase(&self) -> CallPhase {
        self.state.lock().await.phase
    }

    /// Seconds since the call connected
    pub async fn elapsed_secs(&self) -> u32 {
        self.state.lock().await.elapsed_secs
    }

    /// Copy of the full state
    pub async fn snapshot(&self) -> CallState {
        self.state.lock().await.clone()
    }

    /// Flip mute, returning the new value
    pub async fn toggle_mute(&self) -> bool {
        self.state.lock().await.toggle_mute()
    }

    /// Flip video-off, returning the new value
    pub async fn toggle_video(&self) -> bool {
        self.state.lock().await.toggle_video()
    }

    /// Whether connect or tick timers are still scheduled
    pub fn has_pending_timers(&self) -> bool {
        self.driver.is_running()
    }
}
