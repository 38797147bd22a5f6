//! Auris host entry point.
//!
//! Wires a recognizer backend and a microphone gate into the
//! [`ListeningController`] and presents the session on a terminal: an empty
//! line toggles listening, `q` quits. Controller events reach the renderer
//! through one forwarding task per broadcast channel.

mod render;
mod settings;

use std::io::BufRead;
use std::sync::Arc;

use anyhow::Result;
use auris_core::permission::StaticGate;
use auris_core::recognizer::{scripted::ScriptedRecognizer, RecognizerHandle};
use auris_core::transcript::TranscriptBuffer;
use auris_core::ListeningController;
use settings::{default_settings_path, load_settings};
use tracing::{info, warn};

/// Resolve the microphone gate from the environment.
///
/// There is no platform permission dialog on this host; `AURIS_MIC_PERMISSION=denied`
/// exercises the denial path end-to-end.
fn permission_gate_from_env() -> Arc<StaticGate> {
    match std::env::var("AURIS_MIC_PERMISSION").ok().as_deref() {
        Some("denied") => StaticGate::denied(),
        _ => StaticGate::granted(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // ── Tracing ───────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auris=info".parse().unwrap()),
        )
        .init();

    info!("Auris starting");

    let settings_path = default_settings_path();
    let app_settings = load_settings(&settings_path);
    if !settings_path.exists() {
        if let Err(e) = settings::save_settings(&settings_path, &app_settings) {
            warn!("failed to write default settings: {e}");
        }
    }
    info!(
        settings_path = ?settings_path,
        language_hint = %app_settings.language_hint,
        max_candidates = app_settings.max_candidates,
        "runtime settings loaded"
    );

    // ── Controller setup ──────────────────────────────────────────────────
    let (events_tx, events_rx) = crossbeam_channel::unbounded();
    warn!("no platform speech service on this host — using the scripted recognizer");
    let recognizer = RecognizerHandle::new(ScriptedRecognizer::demo(events_tx));

    let controller = Arc::new(ListeningController::new(
        app_settings.session_config(),
        recognizer,
        permission_gate_from_env(),
    ));

    // ── Forward controller events → terminal ──────────────────────────────
    let mut state_rx = controller.subscribe_state();
    tokio::spawn(async move {
        loop {
            match state_rx.recv().await {
                Ok(event) => println!("[{}]", render::toggle_label(event.state)),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    warn!("state receiver lagged by {n} events");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut transcript_rx = controller.subscribe_transcripts();
    tokio::spawn(async move {
        // The presentation layer owns the transcript; the controller only
        // hands it fragments to append.
        let mut transcript = TranscriptBuffer::new();
        loop {
            match transcript_rx.recv().await {
                Ok(event) => {
                    transcript.append(&event.text);
                    println!("{}", render::transcript_line(&transcript));
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    warn!("transcript receiver lagged by {n} events");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut notice_rx = controller.subscribe_notices();
    tokio::spawn(async move {
        loop {
            match notice_rx.recv().await {
                Ok(notice) => eprintln!("{}", render::notice_line(&notice)),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    warn!("notice receiver lagged by {n} events");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // ── Pump recognizer events into the controller ────────────────────────
    // Detached thread: the recognizer keeps its sender for the process
    // lifetime, so this loop never sees a disconnect.
    let controller_for_pump = Arc::clone(&controller);
    std::thread::spawn(move || {
        while let Ok(event) = events_rx.recv() {
            controller_for_pump.handle_event(event);
        }
    });

    // Re-request the microphone permission on startup while not yet granted.
    if !controller.ensure_permission() {
        warn!("listening is unavailable until the microphone permission is granted");
    }

    println!(
        "[{}]  (press Enter to toggle, q to quit)",
        render::toggle_label(controller.state())
    );

    // ── Input loop ────────────────────────────────────────────────────────
    let controller_for_input = Arc::clone(&controller);
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "q" | "quit" => break,
                _ => controller_for_input.toggle(),
            }
        }
    })
    .await?;

    let diag = controller.diagnostics_snapshot();
    info!(
        sessions_started = diag.sessions_started,
        auto_restarts = diag.auto_restarts,
        fragments_emitted = diag.fragments_emitted,
        errors_observed = diag.errors_observed,
        "controller diagnostics at exit"
    );
    Ok(())
}
