//! Runtime bridge between UI command queue and backend event intake.
//!
//! The worker owns a tokio runtime on its own thread. Each command runs as a
//! separate task so a slow results request never holds up a race list.

use std::{sync::Arc, thread};

use client_core::{RaceDataSource, ResultsClient};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(api_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let client = match ResultsClient::new(&api_url) {
            Ok(client) => client,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: {err}"),
                )));
                tracing::error!(api_url = %api_url, "failed to build results client: {err}");
                return;
            }
        };
        tracing::info!(base_url = %client.base_url(), "backend worker ready");
        let source: Arc<dyn RaceDataSource> = Arc::new(client);

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
            serve_commands(source, cmd_rx, ui_tx).await;
        });
    });
}

/// Drains the command queue until the UI side hangs up.
///
/// `cmd_rx.recv()` blocks the worker thread; spawned tasks keep running on the
/// runtime's other threads in the meantime.
async fn serve_commands(
    source: Arc<dyn RaceDataSource>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        let source = Arc::clone(&source);
        let ui_tx = ui_tx.clone();
        tokio::spawn(async move {
            let event = handle_command(source.as_ref(), cmd).await;
            // Load events are never dropped; a missing one would leave the UI
            // waiting on a request that already finished.
            if ui_tx.send(event).is_err() {
                tracing::warn!(command = cmd.name(), "ui event queue closed; discarding result");
            }
        });
    }
    tracing::info!("ui command queue closed; backend worker exiting");
}

pub async fn handle_command(source: &dyn RaceDataSource, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::FetchRaces { generation, year } => {
            let outcome = source.list_races(year).await.map_err(|err| {
                tracing::warn!(year = year.0, "error fetching races: {err}");
                UiError::from_client_error(UiErrorContext::Races, &err)
            });
            UiEvent::RacesLoaded {
                generation,
                year,
                outcome,
            }
        }
        BackendCommand::FetchResults {
            generation,
            year,
            round,
        } => {
            let outcome = source.fetch_results(year, round).await.map_err(|err| {
                tracing::warn!(year = year.0, round = round.0, "error fetching results: {err}");
                UiError::from_client_error(UiErrorContext::Results, &err)
            });
            UiEvent::ResultsLoaded {
                generation,
                year,
                round,
                outcome,
            }
        }
    }
}
