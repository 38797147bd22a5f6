//! Speech recognizer session abstraction.
//!
//! The `RecognizerSession` trait decouples the controller from any specific
//! speech service (platform recognizer binding, scripted playback, test
//! probes). A session is single-shot: it runs from `start()` to a natural
//! end-of-speech, an error, or an explicit `stop()`. Continuity across
//! silences is the controller's job, not the backend's.
//!
//! Backends deliver [`RecognizerEvent`]s on a `crossbeam_channel::Sender`
//! handed to them at construction; the host pumps the receiving end into
//! `ListeningController::handle_event`.

pub mod scripted;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;

/// Configuration for one recognition session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// BCP-47 language tag. `None` lets the service pick the device default.
    pub language: Option<String>,
    /// Prompt shown by recognition UIs that render one. Default: "Speak now...".
    pub prompt: String,
    /// Maximum number of candidate transcriptions to request, best first.
    /// Default: 5.
    pub max_candidates: usize,
    /// Use the free-form dictation language model rather than a web-search
    /// oriented one. Default: true.
    pub free_form: bool,
    /// Whether the session should emit `PartialResults` events. The
    /// controller ignores them either way. Default: false.
    pub partial_results: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: None,
            prompt: "Speak now...".into(),
            max_candidates: 5,
            free_form: true,
            partial_results: false,
        }
    }
}

/// Events a recognition session can emit during one pass.
///
/// This mirrors the full callback surface of platform speech listeners; the
/// controller consumes `Results`, `EndOfSpeech` and `Error` and ignores the
/// rest.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognizerEvent {
    /// The service is ready to receive speech.
    Ready,
    /// The user started speaking.
    BeginSpeech,
    /// Input level changed (backend-defined scale).
    VolumeChanged(f32),
    /// Raw captured audio, if the backend forwards it.
    Buffer(Vec<u8>),
    /// The session ended naturally on silence.
    EndOfSpeech,
    /// The session failed with a platform error code.
    Error(i32),
    /// Candidate transcriptions for the pass, best first.
    Results(Vec<String>),
    /// Streaming partial candidates, best first.
    PartialResults(Vec<String>),
}

/// Contract for recognition session backends.
pub trait RecognizerSession: Send + 'static {
    /// Begin a single-shot recognition pass.
    ///
    /// # Errors
    /// Returns `AurisError::AlreadyListening` if a pass is still active.
    fn start(&mut self, config: &SessionConfig) -> Result<()>;

    /// Ask the active pass to stop.
    ///
    /// The backend follows up with a terminal event (`EndOfSpeech` or
    /// `Error`) on its channel once the pass has wound down.
    ///
    /// # Errors
    /// Returns `AurisError::NotListening` if no pass is active.
    fn stop(&mut self) -> Result<()>;
}

/// Thread-safe reference-counted handle to any `RecognizerSession`
/// implementor.
///
/// `&mut self` on the trait expresses that backends are stateful; all
/// mutation is serialised through this handle's `parking_lot::Mutex`.
#[derive(Clone)]
pub struct RecognizerHandle(pub Arc<Mutex<dyn RecognizerSession>>);

impl RecognizerHandle {
    /// Wrap any `RecognizerSession` in a `RecognizerHandle`.
    pub fn new<S: RecognizerSession>(session: S) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }
}

impl std::fmt::Debug for RecognizerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognizerHandle").finish_non_exhaustive()
    }
}
