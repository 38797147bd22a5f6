use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use auris_core::events::{NoticeKind, SessionState};
use auris_core::permission::{PermissionStatus, StaticGate};
use auris_core::recognizer::{RecognizerHandle, RecognizerSession, SessionConfig};
use auris_core::transcript::TranscriptBuffer;
use auris_core::{AurisError, ListeningController, RecognizerEvent};
use tokio::sync::broadcast::error::TryRecvError;

/// Backend that only counts start/stop calls; events are injected directly
/// through `ListeningController::handle_event`.
struct ProbeRecognizer {
    starts: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
    fail_start: bool,
}

impl RecognizerSession for ProbeRecognizer {
    fn start(&mut self, _config: &SessionConfig) -> std::result::Result<(), AurisError> {
        if self.fail_start {
            return Err(AurisError::Recognition(2));
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) -> std::result::Result<(), AurisError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn probe_controller(
    gate: Arc<StaticGate>,
) -> (ListeningController, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let starts = Arc::new(AtomicUsize::new(0));
    let stops = Arc::new(AtomicUsize::new(0));
    let recognizer = RecognizerHandle::new(ProbeRecognizer {
        starts: Arc::clone(&starts),
        stops: Arc::clone(&stops),
        fail_start: false,
    });
    let controller = ListeningController::new(SessionConfig::default(), recognizer, gate);
    (controller, starts, stops)
}

#[test]
fn toggle_alternates_strictly_between_idle_and_listening() {
    let (controller, _, _) = probe_controller(StaticGate::granted());
    assert_eq!(controller.state(), SessionState::Idle);

    for _ in 0..3 {
        controller.toggle();
        assert_eq!(controller.state(), SessionState::Listening);
        controller.toggle();
        assert_eq!(controller.state(), SessionState::Idle);
    }
}

#[test]
fn end_of_speech_without_stop_intent_chains_exactly_one_start() {
    let (controller, starts, _) = probe_controller(StaticGate::granted());
    controller.toggle();
    assert_eq!(starts.load(Ordering::SeqCst), 1);

    controller.on_session_ended();
    assert_eq!(controller.state(), SessionState::Listening);
    assert_eq!(starts.load(Ordering::SeqCst), 2);
}

#[test]
fn end_of_speech_after_stop_request_settles_idle_without_restart() {
    let (controller, starts, stops) = probe_controller(StaticGate::granted());
    controller.toggle();
    controller.toggle();
    assert!(controller.stop_intent());
    assert_eq!(stops.load(Ordering::SeqCst), 1);

    controller.on_session_ended();
    assert_eq!(controller.state(), SessionState::Idle);
    assert_eq!(starts.load(Ordering::SeqCst), 1);
}

#[test]
fn error_without_stop_intent_restarts_silently() {
    let (controller, starts, _) = probe_controller(StaticGate::granted());
    let mut notices = controller.subscribe_notices();
    let mut states = controller.subscribe_state();

    controller.toggle();
    assert!(matches!(states.try_recv(), Ok(event) if event.state == SessionState::Listening));

    controller.on_session_error(7);
    assert_eq!(controller.state(), SessionState::Listening);
    assert_eq!(starts.load(Ordering::SeqCst), 2);

    // Silent recovery: no notice, and no redundant state event for the
    // Listening self-loop.
    assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));
    assert!(matches!(states.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn error_after_stop_request_raises_one_notice() {
    let (controller, starts, _) = probe_controller(StaticGate::granted());
    let mut notices = controller.subscribe_notices();

    controller.toggle();
    controller.toggle();
    controller.on_session_error(7);

    assert_eq!(controller.state(), SessionState::Idle);
    assert_eq!(starts.load(Ordering::SeqCst), 1);

    let notice = notices.try_recv().expect("one notice for surfaced error");
    assert_eq!(notice.kind, NoticeKind::RecognitionError);
    assert!(notice.message.contains('7'), "message: {}", notice.message);
    assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn results_append_in_order_without_separators() {
    let (controller, _, _) = probe_controller(StaticGate::granted());
    let mut transcripts = controller.subscribe_transcripts();

    controller.toggle();
    controller.on_results(vec!["hello ".into(), "hullo ".into()]);
    controller.on_results(vec!["world".into()]);

    let mut buffer = TranscriptBuffer::new();
    while let Ok(event) = transcripts.try_recv() {
        buffer.append(&event.text);
    }
    assert_eq!(buffer.as_str(), "hello world");
    assert_eq!(buffer.fragment_count(), 2);
}

#[test]
fn results_without_candidates_emit_nothing() {
    let (controller, _, _) = probe_controller(StaticGate::granted());
    let mut transcripts = controller.subscribe_transcripts();

    controller.toggle();
    controller.on_results(vec![]);
    controller.on_results(vec![String::new()]);

    assert!(matches!(transcripts.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn chained_sessions_accumulate_transcript_across_silences() {
    let (controller, starts, _) = probe_controller(StaticGate::granted());
    let mut transcripts = controller.subscribe_transcripts();

    controller.toggle();
    controller.handle_event(RecognizerEvent::Results(vec!["cat".into()]));
    controller.handle_event(RecognizerEvent::EndOfSpeech);
    assert_eq!(controller.state(), SessionState::Listening);

    controller.handle_event(RecognizerEvent::Results(vec!["dog".into()]));
    controller.toggle();
    controller.handle_event(RecognizerEvent::EndOfSpeech);

    assert_eq!(controller.state(), SessionState::Idle);
    assert_eq!(starts.load(Ordering::SeqCst), 2);

    let mut buffer = TranscriptBuffer::new();
    while let Ok(event) = transcripts.try_recv() {
        buffer.append(&event.text);
    }
    assert_eq!(buffer.as_str(), "catdog");

    let diag = controller.diagnostics_snapshot();
    assert_eq!(diag.sessions_started, 2);
    assert_eq!(diag.auto_restarts, 1);
    assert_eq!(diag.fragments_emitted, 2);
}

#[test]
fn non_terminal_events_are_ignored() {
    let (controller, starts, _) = probe_controller(StaticGate::granted());
    controller.toggle();

    controller.handle_event(RecognizerEvent::Ready);
    controller.handle_event(RecognizerEvent::BeginSpeech);
    controller.handle_event(RecognizerEvent::VolumeChanged(0.4));
    controller.handle_event(RecognizerEvent::Buffer(vec![0, 1, 2]));
    controller.handle_event(RecognizerEvent::PartialResults(vec!["hel".into()]));

    assert_eq!(controller.state(), SessionState::Listening);
    assert_eq!(starts.load(Ordering::SeqCst), 1);
}

#[test]
fn denied_permission_blocks_start_with_one_notice_per_denial() {
    let gate = StaticGate::denied();
    let (controller, starts, _) = probe_controller(Arc::clone(&gate));
    let mut notices = controller.subscribe_notices();

    controller.toggle();
    assert_eq!(controller.state(), SessionState::Idle);
    assert_eq!(starts.load(Ordering::SeqCst), 0);

    let notice = notices.try_recv().expect("notice for first denial");
    assert_eq!(notice.kind, NoticeKind::PermissionDenied);
    assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));

    // A second attempt is a second denial — and a second single notice.
    controller.toggle();
    assert_eq!(starts.load(Ordering::SeqCst), 0);
    assert!(notices.try_recv().is_ok());
    assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));

    // Once granted, listening proceeds without further notices.
    gate.set(PermissionStatus::Granted);
    controller.toggle();
    assert_eq!(controller.state(), SessionState::Listening);
    assert_eq!(starts.load(Ordering::SeqCst), 1);
    assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn start_failure_surfaces_a_notice_and_stays_idle() {
    let starts = Arc::new(AtomicUsize::new(0));
    let stops = Arc::new(AtomicUsize::new(0));
    let recognizer = RecognizerHandle::new(ProbeRecognizer {
        starts: Arc::clone(&starts),
        stops: Arc::clone(&stops),
        fail_start: true,
    });
    let controller =
        ListeningController::new(SessionConfig::default(), recognizer, StaticGate::granted());
    let mut notices = controller.subscribe_notices();

    controller.toggle();
    assert_eq!(controller.state(), SessionState::Idle);
    let notice = notices.try_recv().expect("notice for failed start");
    assert_eq!(notice.kind, NoticeKind::RecognitionError);
}
