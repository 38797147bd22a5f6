//! Microphone permission boundary.
//!
//! The platform's permission dialog is an external collaborator: the
//! controller only asks a [`MicrophoneGate`] for the current answer and
//! re-requests while not yet granted. There is no retry loop here — the
//! platform's own dialog is the recovery path.

use std::sync::Arc;

use parking_lot::Mutex;

/// Answer from the platform permission service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user has not been asked yet.
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

/// Request/response boundary to the platform microphone permission.
pub trait MicrophoneGate: Send + Sync + 'static {
    /// Current permission state, without prompting the user.
    fn status(&self) -> PermissionStatus;

    /// Ask the platform to prompt the user; returns the resulting state.
    ///
    /// Calling this while already granted must be a no-op returning
    /// `Granted`.
    fn request(&self) -> PermissionStatus;
}

/// Fixed-answer gate for hosts without a real permission service, and tests.
pub struct StaticGate {
    answer: Mutex<PermissionStatus>,
}

impl StaticGate {
    pub fn new(answer: PermissionStatus) -> Arc<Self> {
        Arc::new(Self {
            answer: Mutex::new(answer),
        })
    }

    pub fn granted() -> Arc<Self> {
        Self::new(PermissionStatus::Granted)
    }

    pub fn denied() -> Arc<Self> {
        Self::new(PermissionStatus::Denied)
    }

    /// Change the answer later (e.g. the user grants after a denial).
    pub fn set(&self, answer: PermissionStatus) {
        *self.answer.lock() = answer;
    }
}

impl MicrophoneGate for StaticGate {
    fn status(&self) -> PermissionStatus {
        *self.answer.lock()
    }

    fn request(&self) -> PermissionStatus {
        *self.answer.lock()
    }
}
