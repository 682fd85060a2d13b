//! Read-aloud sessions.
//!
//! The main thread owns a [`ReadingController`] (`Idle -> Reading <-> Paused -> Idle`).
//! Playback runs on a dedicated worker thread that only shares a stop token and a
//! pause flag with the main thread and reports progress over a channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use kanal::Sender;
use songngu_config::reader::ReaderConfig;
use songngu_types::TextRange;
use tokio_util::sync::CancellationToken;

/// Speech synthesis and playback capability
pub trait SpeechOutput: Send + Sync {
    /// Start speaking `text`; returns once playback has begun
    fn play(&self, text: &str) -> Result<(), SpeechError>;

    /// Whether the last `play` is still audible
    fn is_busy(&self) -> bool;

    /// Abort current playback
    fn halt(&self);
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Playback failed: {0}")]
    Playback(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ReadingError {
    #[error("A reading session is already running")]
    AlreadyActive,

    #[error("Nothing to read")]
    NothingToRead,

    #[error("Failed to start reading worker: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingState {
    Idle,
    Reading,
    Paused,
}

/// A piece of text read in one go, with where it sits in the primary document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingSegment {
    pub range: TextRange,
    pub text: String,
}

/// Progress reported by the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingEvent {
    Segment { session: u64, range: TextRange },
    Failed { session: u64, message: String },
    Finished { session: u64, cancelled: bool },
}

impl ReadingEvent {
    pub fn session(&self) -> u64 {
        match self {
            ReadingEvent::Segment { session, .. }
            | ReadingEvent::Failed { session, .. }
            | ReadingEvent::Finished { session, .. } => *session,
        }
    }
}

/// What the reading highlight should do after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingTransition {
    Highlight(TextRange),
    Clear,
    Failed(String),
    Ignored,
}

#[derive(Debug, Clone, Copy)]
pub struct ReadingTimings {
    pub poll: Duration,
    pub pause_poll: Duration,
}

impl From<&ReaderConfig> for ReadingTimings {
    fn from(config: &ReaderConfig) -> Self {
        Self {
            poll: Duration::from_millis(config.reading_poll_ms),
            pause_poll: Duration::from_millis(config.pause_poll_ms),
        }
    }
}

struct ActiveSession {
    id: u64,
    stop: CancellationToken,
    paused: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

/// Main-thread side of the reading state machine
pub struct ReadingController {
    state: ReadingState,
    active: Option<ActiveSession>,
    next_id: u64,
}

impl Default for ReadingController {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingController {
    pub fn new() -> Self {
        Self {
            state: ReadingState::Idle,
            active: None,
            next_id: 1,
        }
    }

    pub fn state(&self) -> ReadingState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != ReadingState::Idle
    }

    /// Idle -> Reading. A second session is rejected while one is running.
    pub fn start(
        &mut self,
        segments: Vec<ReadingSegment>,
        speech: Arc<dyn SpeechOutput>,
        timings: ReadingTimings,
        events: Sender<ReadingEvent>,
    ) -> Result<u64, ReadingError> {
        if self.is_active() {
            return Err(ReadingError::AlreadyActive);
        }
        if segments.is_empty() {
            return Err(ReadingError::NothingToRead);
        }

        let id = self.next_id;
        self.next_id += 1;

        let stop = CancellationToken::new();
        let paused = Arc::new(AtomicBool::new(false));
        let worker = Worker {
            session: id,
            segments,
            speech,
            stop: stop.clone(),
            paused: paused.clone(),
            timings,
            events,
        };
        let handle = thread::Builder::new()
            .name(format!("reading-{id}"))
            .spawn(move || worker.run())?;

        tracing::info!("Reading session {} started", id);
        self.active = Some(ActiveSession {
            id,
            stop,
            paused,
            handle: Some(handle),
        });
        self.state = ReadingState::Reading;
        Ok(id)
    }

    /// Reading <-> Paused; does nothing while idle
    pub fn toggle_pause(&mut self) -> ReadingState {
        let Some(active) = &self.active else {
            return self.state;
        };

        self.state = match self.state {
            ReadingState::Reading => {
                active.paused.store(true, Ordering::Release);
                ReadingState::Paused
            }
            ReadingState::Paused => {
                active.paused.store(false, Ordering::Release);
                ReadingState::Reading
            }
            ReadingState::Idle => ReadingState::Idle,
        };
        tracing::debug!("Reading session {} now {:?}", active.id, self.state);
        self.state
    }

    /// Any state -> Idle. The worker notices on its next poll tick.
    pub fn stop(&mut self) -> ReadingTransition {
        match self.active.take() {
            Some(active) => {
                active.stop.cancel();
                tracing::info!("Reading session {} stopped", active.id);
                self.state = ReadingState::Idle;
                ReadingTransition::Clear
            }
            None => {
                self.state = ReadingState::Idle;
                ReadingTransition::Clear
            }
        }
    }

    /// Fold a worker event into the state machine; events of stale sessions are ignored
    pub fn on_event(&mut self, event: ReadingEvent) -> ReadingTransition {
        let current = self.active.as_ref().map(|a| a.id);
        if current != Some(event.session()) {
            return ReadingTransition::Ignored;
        }

        match event {
            ReadingEvent::Segment { range, .. } => ReadingTransition::Highlight(range),
            ReadingEvent::Failed { message, .. } => ReadingTransition::Failed(message),
            ReadingEvent::Finished { session, cancelled } => {
                if let Some(mut active) = self.active.take() {
                    if let Some(handle) = active.handle.take() {
                        if handle.join().is_err() {
                            tracing::error!("Reading worker {} panicked", session);
                        }
                    }
                }
                tracing::info!("Reading session {} finished (cancelled: {})", session, cancelled);
                self.state = ReadingState::Idle;
                ReadingTransition::Clear
            }
        }
    }
}

impl Drop for ReadingController {
    fn drop(&mut self) {
        if let Some(active) = &self.active {
            active.stop.cancel();
        }
    }
}

struct Worker {
    session: u64,
    segments: Vec<ReadingSegment>,
    speech: Arc<dyn SpeechOutput>,
    stop: CancellationToken,
    paused: Arc<AtomicBool>,
    timings: ReadingTimings,
    events: Sender<ReadingEvent>,
}

impl Worker {
    fn run(self) {
        'segments: for segment in &self.segments {
            if self.stop.is_cancelled() {
                break;
            }

            self.emit(ReadingEvent::Segment {
                session: self.session,
                range: segment.range,
            });

            if let Err(e) = self.speech.play(&segment.text) {
                tracing::warn!("Reading session {}: {}", self.session, e);
                self.emit(ReadingEvent::Failed {
                    session: self.session,
                    message: e.to_string(),
                });
                continue;
            }

            // Wait for playback; a paused session holds here even after the audio ends
            loop {
                if self.stop.is_cancelled() {
                    self.speech.halt();
                    break 'segments;
                }
                let paused = self.paused.load(Ordering::Acquire);
                if !paused && !self.speech.is_busy() {
                    break;
                }
                thread::sleep(if paused {
                    self.timings.pause_poll
                } else {
                    self.timings.poll
                });
            }
        }

        self.emit(ReadingEvent::Finished {
            session: self.session,
            cancelled: self.stop.is_cancelled(),
        });
    }

    fn emit(&self, event: ReadingEvent) {
        if let Err(e) = self.events.send(event) {
            tracing::debug!("Reading event dropped: {}", e);
        }
    }
}
