//! `ScriptedRecognizer` — deterministic backend that plays canned events.
//!
//! Stands in for the platform speech service on hosts that have none. Each
//! `start()` drains the next scripted pass into the event channel, so the
//! full controller/host loop (toggle, chaining, transcript accumulation) can
//! be exercised end-to-end.

use std::collections::VecDeque;

use crossbeam_channel::Sender;
use tracing::debug;

use crate::error::{AurisError, Result};
use crate::recognizer::{RecognizerEvent, RecognizerSession, SessionConfig};

/// One recognition pass worth of scripted events.
pub type ScriptedPass = Vec<RecognizerEvent>;

/// Plays a fixed script, one pass per `start()` call.
///
/// A pass containing a terminal event (`EndOfSpeech` or `Error`) leaves the
/// backend ready for the next `start()`; a pass without one stays active
/// until `stop()` is called. When the script runs dry, further passes emit
/// only `Ready` and wait for an explicit stop.
pub struct ScriptedRecognizer {
    events_tx: Sender<RecognizerEvent>,
    passes: VecDeque<ScriptedPass>,
    active: bool,
    starts: usize,
}

impl ScriptedRecognizer {
    pub fn new(events_tx: Sender<RecognizerEvent>, passes: Vec<ScriptedPass>) -> Self {
        Self {
            events_tx,
            passes: passes.into(),
            active: false,
            starts: 0,
        }
    }

    /// A short demo script: two utterances, each ending on silence.
    pub fn demo(events_tx: Sender<RecognizerEvent>) -> Self {
        Self::new(
            events_tx,
            vec![
                vec![
                    RecognizerEvent::Ready,
                    RecognizerEvent::BeginSpeech,
                    RecognizerEvent::Results(vec!["the quick brown fox ".into()]),
                    RecognizerEvent::EndOfSpeech,
                ],
                vec![
                    RecognizerEvent::Ready,
                    RecognizerEvent::BeginSpeech,
                    RecognizerEvent::Results(vec!["jumps over the lazy dog".into()]),
                    RecognizerEvent::EndOfSpeech,
                ],
            ],
        )
    }

    /// Number of `start()` calls accepted so far.
    pub fn starts(&self) -> usize {
        self.starts
    }
}

impl RecognizerSession for ScriptedRecognizer {
    fn start(&mut self, config: &SessionConfig) -> Result<()> {
        if self.active {
            return Err(AurisError::AlreadyListening);
        }
        self.active = true;
        self.starts += 1;
        debug!(pass = self.starts, prompt = %config.prompt, "scripted pass started");

        match self.passes.pop_front() {
            Some(pass) => {
                let terminal = pass.iter().any(|event| {
                    matches!(
                        event,
                        RecognizerEvent::EndOfSpeech | RecognizerEvent::Error(_)
                    )
                });
                for event in pass {
                    let _ = self.events_tx.send(event);
                }
                if terminal {
                    self.active = false;
                }
            }
            None => {
                // Script exhausted — stay silent until stopped.
                let _ = self.events_tx.send(RecognizerEvent::Ready);
            }
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if !self.active {
            return Err(AurisError::NotListening);
        }
        self.active = false;
        let _ = self.events_tx.send(RecognizerEvent::EndOfSpeech);
        Ok(())
    }
}
