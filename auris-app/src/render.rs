//! Terminal presentation of the listening toggle and transcript.

use auris_core::events::{NoticeEvent, SessionState};
use auris_core::transcript::TranscriptBuffer;

/// Label for the toggle control, mirroring the session state.
pub fn toggle_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "Start Listening",
        SessionState::Listening => "Stop Listening",
    }
}

/// The transcript line shown beneath the toggle.
pub fn transcript_line(transcript: &TranscriptBuffer) -> String {
    format!("You said: {}", transcript.as_str())
}

/// One ephemeral notice line.
pub fn notice_line(notice: &NoticeEvent) -> String {
    format!("[{}] {}", notice.timestamp, notice.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use auris_core::events::NoticeKind;

    #[test]
    fn toggle_label_follows_state() {
        assert_eq!(toggle_label(SessionState::Idle), "Start Listening");
        assert_eq!(toggle_label(SessionState::Listening), "Stop Listening");
    }

    #[test]
    fn transcript_line_concatenates_fragments() {
        let mut transcript = TranscriptBuffer::new();
        transcript.append("hello ");
        transcript.append("world");
        assert_eq!(transcript_line(&transcript), "You said: hello world");
    }

    #[test]
    fn notice_line_carries_the_message() {
        let notice = NoticeEvent {
            seq: 1,
            kind: NoticeKind::RecognitionError,
            message: "recognition error (code 5)".into(),
            timestamp: "2025-11-02T10:00:00+00:00".into(),
        };
        assert!(notice_line(&notice).contains("recognition error (code 5)"));
    }
}
