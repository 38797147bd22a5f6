//! `ListeningController` — session-chaining state machine.
//!
//! ## Lifecycle
//!
//! ```text
//! toggle()              Idle ──► Listening      stop intent cleared, session started
//! toggle()              Listening ──► Idle      stop intent set, session stopped
//! end-of-speech/error   Listening ──► Listening stop intent clear: next session started
//! end-of-speech/error   Listening ──► Idle      stop intent set: settle, no restart
//! ```
//!
//! A platform recognition session is single-shot — it terminates on every
//! stretch of silence. Continuous listening is an illusion the controller
//! maintains by immediately starting the next session whenever one
//! terminates and the user has not asked to stop. The stop-intent flag is
//! what distinguishes "silence ended the session, chain the next one" from
//! "the user asked to stop, settle down".
//!
//! ## Threading
//!
//! The controller is `Send + Sync` — all fields use interior mutability.
//! Handlers are expected to run on one logical event thread (the host's
//! pump); the locks exist so the toggle input and the pump can share an
//! `Arc<ListeningController>` safely.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use crate::error::AurisError;
use crate::events::{
    current_timestamp, NoticeEvent, NoticeKind, SessionState, StateEvent, TranscriptEvent,
};
use crate::permission::MicrophoneGate;
use crate::recognizer::{RecognizerEvent, RecognizerHandle, SessionConfig};

/// Broadcast channel capacity: 256 events buffered for slow consumers.
const BROADCAST_CAP: usize = 256;

/// Shared controller counters for observability.
pub struct ControllerDiagnostics {
    /// Recognition sessions started, including chained restarts.
    pub sessions_started: AtomicUsize,
    /// Sessions started by the chaining path rather than a user toggle.
    pub auto_restarts: AtomicUsize,
    /// Transcript fragments forwarded to subscribers.
    pub fragments_emitted: AtomicUsize,
    /// Recognizer error events observed (recovered or surfaced).
    pub errors_observed: AtomicUsize,
    /// Notices raised on the notification channel.
    pub notices_raised: AtomicUsize,
}

impl Default for ControllerDiagnostics {
    fn default() -> Self {
        Self {
            sessions_started: AtomicUsize::new(0),
            auto_restarts: AtomicUsize::new(0),
            fragments_emitted: AtomicUsize::new(0),
            errors_observed: AtomicUsize::new(0),
            notices_raised: AtomicUsize::new(0),
        }
    }
}

impl ControllerDiagnostics {
    pub fn reset(&self) {
        self.sessions_started.store(0, Ordering::Relaxed);
        self.auto_restarts.store(0, Ordering::Relaxed);
        self.fragments_emitted.store(0, Ordering::Relaxed);
        self.errors_observed.store(0, Ordering::Relaxed);
        self.notices_raised.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            auto_restarts: self.auto_restarts.load(Ordering::Relaxed),
            fragments_emitted: self.fragments_emitted.load(Ordering::Relaxed),
            errors_observed: self.errors_observed.load(Ordering::Relaxed),
            notices_raised: self.notices_raised.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DiagnosticsSnapshot {
    pub sessions_started: usize,
    pub auto_restarts: usize,
    pub fragments_emitted: usize,
    pub errors_observed: usize,
    pub notices_raised: usize,
}

/// The top-level controller handle.
///
/// Wrap in `Arc<ListeningController>` to share between the host's input
/// handler and its recognizer-event pump.
pub struct ListeningController {
    config: SessionConfig,
    recognizer: RecognizerHandle,
    permission: Arc<dyn MicrophoneGate>,
    /// Canonical state (written under the Mutex, read from anywhere).
    state: Mutex<SessionState>,
    /// `true` only between a user stop request and the following terminal event.
    stop_intent: AtomicBool,
    /// Broadcast sender for state change events.
    state_tx: broadcast::Sender<StateEvent>,
    /// Broadcast sender for transcript fragments.
    transcript_tx: broadcast::Sender<TranscriptEvent>,
    /// Broadcast sender for ephemeral user-facing notices.
    notice_tx: broadcast::Sender<NoticeEvent>,
    /// Monotonically increasing event sequence counter.
    seq: AtomicU64,
    diagnostics: Arc<ControllerDiagnostics>,
}

impl ListeningController {
    /// Create a new controller in the `Idle` state. Does not touch the
    /// recognizer — listening begins on the first `toggle()`.
    pub fn new(
        config: SessionConfig,
        recognizer: RecognizerHandle,
        permission: Arc<dyn MicrophoneGate>,
    ) -> Self {
        let (state_tx, _) = broadcast::channel(BROADCAST_CAP);
        let (transcript_tx, _) = broadcast::channel(BROADCAST_CAP);
        let (notice_tx, _) = broadcast::channel(BROADCAST_CAP);

        Self {
            config,
            recognizer,
            permission,
            state: Mutex::new(SessionState::Idle),
            stop_intent: AtomicBool::new(false),
            state_tx,
            transcript_tx,
            notice_tx,
            seq: AtomicU64::new(0),
            diagnostics: Arc::new(ControllerDiagnostics::default()),
        }
    }

    /// Current session state (snapshot).
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// True while a user stop request has not yet settled.
    pub fn stop_intent(&self) -> bool {
        self.stop_intent.load(Ordering::SeqCst)
    }

    /// Subscribe to state change events.
    pub fn subscribe_state(&self) -> broadcast::Receiver<StateEvent> {
        self.state_tx.subscribe()
    }

    /// Subscribe to transcript fragments.
    pub fn subscribe_transcripts(&self) -> broadcast::Receiver<TranscriptEvent> {
        self.transcript_tx.subscribe()
    }

    /// Subscribe to ephemeral user-facing notices.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<NoticeEvent> {
        self.notice_tx.subscribe()
    }

    /// Snapshot of controller counters for observability.
    pub fn diagnostics_snapshot(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }

    /// Ask the permission gate, prompting the user while not yet granted.
    ///
    /// Each denied request raises exactly one `PermissionDenied` notice.
    /// Hosts call this once at startup (the screen-mount re-request) and the
    /// controller calls it again on every attempt to start listening.
    pub fn ensure_permission(&self) -> bool {
        if self.permission.status().is_granted() {
            return true;
        }
        let answer = self.permission.request();
        if answer.is_granted() {
            return true;
        }
        warn!(?answer, "microphone permission not granted");
        self.raise_notice(
            NoticeKind::PermissionDenied,
            AurisError::PermissionDenied.to_string(),
        );
        false
    }

    /// Flip between idle and listening.
    ///
    /// Fire-and-forget against the recognizer: a start failure is surfaced
    /// as a notice and the controller stays idle; a stop failure is logged
    /// and the controller settles to idle regardless.
    pub fn toggle(&self) {
        match self.state() {
            SessionState::Idle => {
                if !self.ensure_permission() {
                    return;
                }
                self.diagnostics.reset();
                self.stop_intent.store(false, Ordering::SeqCst);
                match self.recognizer.0.lock().start(&self.config) {
                    Ok(()) => {
                        self.diagnostics
                            .sessions_started
                            .fetch_add(1, Ordering::Relaxed);
                        info!("listening started");
                        self.set_state(SessionState::Listening, None);
                    }
                    Err(e) => {
                        warn!("recognizer start failed: {e}");
                        self.raise_notice(NoticeKind::RecognitionError, e.to_string());
                    }
                }
            }
            SessionState::Listening => {
                self.stop_intent.store(true, Ordering::SeqCst);
                if let Err(e) = self.recognizer.0.lock().stop() {
                    // The pass may have already ended on its own.
                    debug!("recognizer stop: {e}");
                }
                info!("listening stopped by user");
                self.set_state(SessionState::Idle, None);
            }
        }
    }

    /// Route one recognizer event to its handler.
    pub fn handle_event(&self, event: RecognizerEvent) {
        match event {
            RecognizerEvent::Results(candidates) => self.on_results(candidates),
            RecognizerEvent::EndOfSpeech => self.on_session_ended(),
            RecognizerEvent::Error(code) => self.on_session_error(code),
            other => trace!(?other, "ignoring recognizer event"),
        }
    }

    /// A recognition pass completed on its own (silence).
    pub fn on_session_ended(&self) {
        if self.stop_intent.load(Ordering::SeqCst) {
            self.set_state(SessionState::Idle, None);
        } else {
            self.chain_next_session();
        }
    }

    /// A recognition pass failed with a platform error code.
    ///
    /// Recovered silently by chaining the next session unless the user has
    /// asked to stop, in which case the code is surfaced as one notice.
    pub fn on_session_error(&self, code: i32) {
        self.diagnostics.errors_observed.fetch_add(1, Ordering::Relaxed);
        if self.stop_intent.load(Ordering::SeqCst) {
            let err = AurisError::Recognition(code);
            warn!("recognizer error after stop request: {err}");
            self.set_state(SessionState::Idle, Some(err.to_string()));
            self.raise_notice(NoticeKind::RecognitionError, err.to_string());
        } else {
            debug!(code, "recognizer error while listening — chaining next session");
            self.chain_next_session();
        }
    }

    /// Candidate transcriptions arrived; forward the best one.
    pub fn on_results(&self, candidates: Vec<String>) {
        let Some(best) = candidates.into_iter().next() else {
            trace!("results event carried no candidates");
            return;
        };
        if best.is_empty() {
            return;
        }
        self.diagnostics
            .fragments_emitted
            .fetch_add(1, Ordering::Relaxed);
        let _ = self.transcript_tx.send(TranscriptEvent {
            seq: self.next_seq(),
            text: best,
        });
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    fn chain_next_session(&self) {
        match self.recognizer.0.lock().start(&self.config) {
            Ok(()) => {
                self.diagnostics
                    .sessions_started
                    .fetch_add(1, Ordering::Relaxed);
                self.diagnostics.auto_restarts.fetch_add(1, Ordering::Relaxed);
                debug!("chained next recognition session");
                self.set_state(SessionState::Listening, None);
            }
            Err(e) => {
                warn!("failed to chain next recognition session: {e}");
                self.set_state(SessionState::Idle, Some(e.to_string()));
                self.raise_notice(NoticeKind::RecognitionError, e.to_string());
            }
        }
    }

    fn set_state(&self, next: SessionState, detail: Option<String>) {
        {
            let mut state = self.state.lock();
            if *state == next {
                return;
            }
            *state = next;
        }
        let _ = self.state_tx.send(StateEvent {
            seq: self.next_seq(),
            state: next,
            detail,
        });
    }

    fn raise_notice(&self, kind: NoticeKind, message: String) {
        self.diagnostics.notices_raised.fetch_add(1, Ordering::Relaxed);
        let _ = self.notice_tx.send(NoticeEvent {
            seq: self.next_seq(),
            kind,
            message,
            timestamp: current_timestamp(),
        });
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }
}
