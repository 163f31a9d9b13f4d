//! Voice-note recording session
//!
//! `idle -> recording -> idle`. Stopping either commits the clip as one audio
//! message through the conversation store or discards it.

use crate::conversations::ConversationStore;
use crate::session::timer::Timer;
use crate::storage::{ChatTarget, Message, MessageKind, Settings};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Recording phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingPhase {
    /// Not recording
    #[default]
    Idle,
    /// Capturing audio
    Recording,
}

/// Pure recording state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingState {
    /// Current phase
    pub phase: RecordingPhase,
    /// Seconds recorded so far
    pub elapsed_secs: u32,
}

impl RecordingState {
    /// Begin recording with a fresh counter. Only valid from idle.
    pub fn start(&mut self) -> bool {
        if self.phase != RecordingPhase::Idle {
            return false;
        }
        self.phase = RecordingPhase::Recording;
        self.elapsed_secs = 0;
        true
    }

    /// Advance the counter. Ignored unless recording.
    pub fn tick(&mut self) -> bool {
        if self.phase != RecordingPhase::Recording {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        true
    }

    /// Return to idle, yielding the recorded length
    pub fn stop(&mut self) -> Option<u32> {
        if self.phase != RecordingPhase::Recording {
            return None;
        }
        let duration = self.elapsed_secs;
        *self = Self::default();
        Some(duration)
    }
}

/// Timer-driven recording session
#[derive(Debug)]
pub struct RecordingSession {
    state: Arc<Mutex<RecordingState>>,
    ticker: Timer,
    tick_interval: Duration,
}

impl RecordingSession {
    /// Create an idle session
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: Arc::new(Mutex::new(RecordingState::default())),
            ticker: Timer::idle(),
            tick_interval: settings.tick_interval(),
        }
    }

    /// Start recording
    ///
    /// # Returns
    /// False if already recording
    pub async fn start(&mut self) -> bool {
        if !self.state.lock().await.start() {
            return false;
        }
        let state = Arc::clone(&self.state);
        self.ticker = Timer::every(self.tick_interval, move || {
            let state = Arc::clone(&state);
            async move { state.lock().await.tick() }
        });
        tracing::debug!("Recording started");
        true
    }

    /// Stop recording, committing or discarding the clip
    ///
    /// A committed clip is sent to `target` as one audio message whose
    /// duration is the elapsed counter at the moment of stopping.
    ///
    /// # Returns
    /// * `Ok(Some(message))` - Clip committed
    /// * `Ok(None)` - Discarded, or nothing was recording
    ///
    /// # Errors
    /// Propagates the store's error if the viewer may no longer post to `target`
    pub async fn stop(&mut self, commit: bool, store: &ConversationStore, target: &ChatTarget) -> Result<Option<Message>> {
        self.ticker.cancel();
        let Some(duration_secs) = self.state.lock().await.stop() else {
            return Ok(None);
        };

        if !commit {
            tracing::debug!("Discarded {}s recording", duration_secs);
            return Ok(None);
        }

        let clip_ref = format!("voice-note:{}", uuid::Uuid::new_v4());
        let sent = store
            .send(target, &clip_ref, MessageKind::Audio { duration_secs })
            .await?;
        if sent.is_some() {
            tracing::info!("Committed {}s voice note to {}", duration_secs, target.key());
        }
        Ok(sent)
    }

    /// Current phase
    pub async fn phase(&self) -> RecordingPhase {
        self.state.lock().await.phase
    }

    /// Whether audio is being captured
    pub async fn is_recording(&self) -> bool {
        self.phase().await == RecordingPhase::Recording
    }

    /// Seconds recorded so far
    pub async fn elapsed_secs(&self) -> u32 {
        self.state.lock().await.elapsed_secs
    }

    /// Whether the tick timer is still scheduled
    pub fn has_pending_timers(&self) -> bool {
        self.ticker.is_running()
    }
}
