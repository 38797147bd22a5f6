//! # auris-core
//!
//! Chained speech-recognition session controller SDK.
//!
//! ## Architecture
//!
//! ```text
//! Toggle input → ListeningController ── start()/stop() ──► RecognizerSession
//!                        ▲                                       │
//!                        └── handle_event() ◄── event channel ───┘
//!                        │
//!          broadcast::Sender<StateEvent | TranscriptEvent | NoticeEvent>
//! ```
//!
//! The platform speech service sits behind the
//! [`RecognizerSession`](recognizer::RecognizerSession) trait. A recognition
//! session is single-shot — it ends on every stretch of silence — so the
//! controller chains one session into the next until the user explicitly
//! stops. Presentation layers subscribe to the broadcast channels; the
//! controller never calls into them directly.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod controller;
pub mod error;
pub mod events;
pub mod permission;
pub mod recognizer;
pub mod transcript;

// Convenience re-exports for downstream crates
pub use controller::{ControllerDiagnostics, DiagnosticsSnapshot, ListeningController};
pub use error::AurisError;
pub use events::{NoticeEvent, NoticeKind, SessionState, StateEvent, TranscriptEvent};
pub use permission::{MicrophoneGate, PermissionStatus, StaticGate};
pub use recognizer::{
    scripted::ScriptedRecognizer, RecognizerEvent, RecognizerHandle, RecognizerSession,
    SessionConfig,
};
pub use transcript::TranscriptBuffer;
