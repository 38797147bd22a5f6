//! Event payloads broadcast to presentation subscribers.
//!
//! The controller never calls into the presentation layer directly. State
//! changes, transcript fragments, and user-facing notices all flow through
//! `tokio::sync::broadcast` channels carrying the types in this module, so
//! any surface (terminal renderer, GUI bridge) can subscribe without the
//! controller knowing it exists.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Whether the user currently has listening engaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No recognition session requested.
    #[default]
    Idle,
    /// A recognition session is active, or is being chained into the next one.
    Listening,
}

/// Emitted whenever the controller's state changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateEvent {
    /// Monotonically increasing event sequence number.
    pub seq: u64,
    pub state: SessionState,
    /// Optional human-readable detail (e.g. why listening settled to idle).
    pub detail: Option<String>,
}

// ---------------------------------------------------------------------------
// Transcript events
// ---------------------------------------------------------------------------

/// Emitted for each recognized fragment. Carries the best candidate only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEvent {
    /// Monotonically increasing event sequence number.
    pub seq: u64,
    /// Recognized text, exactly as the recognizer produced it.
    pub text: String,
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// One ephemeral user-facing message (the toast analog).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeEvent {
    /// Monotonically increasing event sequence number.
    pub seq: u64,
    pub kind: NoticeKind,
    pub message: String,
    /// RFC 3339 timestamp of when the notice was raised.
    pub timestamp: String,
}

/// Why a notice was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// The microphone permission request came back denied.
    PermissionDenied,
    /// The recognizer reported an error after the user asked to stop.
    RecognitionError,
}

/// Current time in RFC 3339 format, used to stamp notices.
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
