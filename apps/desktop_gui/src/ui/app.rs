use std::time::Duration;

use clap::Parser;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Round, Year};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::SelectionState;
use crate::ui::{pickers, results_table};

#[derive(Debug, Clone, Parser)]
#[command(name = "desktop_gui", about = "Browse Formula 1 race results by season")]
pub struct StartupConfig {
    /// Base URL of the results server.
    #[arg(long, env = "F1_RESULTS_API_URL", default_value = client_core::DEFAULT_API_URL)]
    pub api_url: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            api_url: client_core::DEFAULT_API_URL.to_string(),
        }
    }
}

pub struct ResultsApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    selection: SelectionState,
    status: String,
    api_url: String,
}

impl ResultsApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            selection: SelectionState::new(),
            status: "Starting".to_string(),
            api_url: startup.api_url,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    if err.context() == UiErrorContext::BackendStartup {
                        tracing::error!(category = ?err.category(), "{}", err.message());
                    }
                    self.status = err.message().to_string();
                }
                UiEvent::RacesLoaded {
                    generation,
                    year,
                    outcome,
                } => self.selection.apply_races(generation, year, outcome),
                UiEvent::ResultsLoaded {
                    generation,
                    year,
                    round,
                    outcome,
                } => self.selection.apply_results(generation, year, round, outcome),
            }
        }
    }

    pub fn choose_year(&mut self, year: Option<Year>) {
        if let Some(cmd) = self.selection.select_year(year) {
            self.send_or_roll_back(cmd);
        }
    }

    pub fn choose_round(&mut self, round: Option<Round>) {
        if let Some(cmd) = self.selection.select_round(round) {
            self.send_or_roll_back(cmd);
        }
    }

    fn send_or_roll_back(&mut self, cmd: BackendCommand) {
        if !dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            self.selection.request_not_sent(cmd, &self.status);
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(&self.api_url);
                });
            });
        });
    }

    fn show_race_header(&self, ui: &mut egui::Ui) {
        if let Some(info) = self.selection.race_info() {
            ui.add_space(8.0);
            ui.heading(&info.race_name);
            ui.label(info.subtitle());
        }
    }

    fn show_results_area(&mut self, ui: &mut egui::Ui) {
        if self.selection.loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading results...");
            });
        }

        if let Some(error) = self.selection.error() {
            ui.colored_label(ui.visuals().error_fg_color, error);
        }

        if !self.selection.show_results_table() {
            self.selection.clear_hover();
            return;
        }

        ui.add_space(8.0);
        let viewport_height = ui.ctx().screen_rect().height();
        match results_table::show(ui, self.selection.results()) {
            Some((index, pointer)) => self.selection.hover_row(index, pointer, viewport_height),
            None => self.selection.clear_hover(),
        }
    }
}

impl eframe::App for ResultsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("F1 Race Results");
            ui.add_space(8.0);

            let picked_year =
                pickers::year_picker(ui, self.selection.years(), self.selection.selected_year());
            if let Some(year) = picked_year {
                self.choose_year(year);
            }

            let picked_round = pickers::race_picker(
                ui,
                self.selection.races(),
                self.selection.selected_round(),
            );
            if let Some(round) = picked_round {
                self.choose_round(round);
            }

            self.show_race_header(ui);
            self.show_results_area(ui);
        });

        if let Some(row) = self.selection.hovered_result() {
            results_table::show_driver_tooltip(ctx, self.selection.tooltip_position(), row);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::UiError;
    use crossbeam_channel::bounded;
    use shared::protocol::{Constructor, Driver, RaceSummary, ResultRow};

    fn app() -> (ResultsApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        (
            ResultsApp::new(cmd_tx, ui_rx, StartupConfig::default()),
            cmd_rx,
            ui_tx,
        )
    }

    fn result(given_name: &str, family_name: &str, position: u32) -> ResultRow {
        ResultRow {
            race_name: "Bahrain GP".to_string(),
            round: Round(1),
            date: "2023-03-05".to_string(),
            driver: Driver {
                given_name: given_name.to_string(),
                family_name: family_name.to_string(),
                nationality: String::new(),
                date_of_birth: String::new(),
                permanent_number: None,
            },
            constructor: Constructor {
                name: "Red Bull".to_string(),
            },
            grid: position,
            position: Some(position),
            status: "Finished".to_string(),
            points: 25.0,
            laps: Some(57),
            fastest_lap: None,
            number: None,
        }
    }

    #[test]
    fn startup_config_defaults_to_local_server() {
        let config = StartupConfig::try_parse_from(["desktop_gui"]).expect("parse");
        assert_eq!(config.api_url, "http://127.0.0.1:5000");

        let config = StartupConfig::try_parse_from(["desktop_gui", "--api-url", "http://f1.test"])
            .expect("parse");
        assert_eq!(config.api_url, "http://f1.test");
    }

    #[test]
    fn picking_year_then_race_drives_backend_commands() {
        let (mut app, cmd_rx, ui_tx) = app();

        app.choose_year(Some(Year(2023)));
        let Ok(BackendCommand::FetchRaces { generation, year }) = cmd_rx.try_recv() else {
            panic!("expected race fetch");
        };
        assert_eq!(year, Year(2023));

        ui_tx
            .send(UiEvent::RacesLoaded {
                generation,
                year,
                outcome: Ok(vec![RaceSummary {
                    round: Round(1),
                    name: "Bahrain GP".to_string(),
                }]),
            })
            .expect("send");
        app.process_ui_events();
        assert_eq!(
            pickers::race_label(app.selection().races(), Some(Round(1))),
            "Bahrain GP (Round 1)"
        );

        app.choose_round(Some(Round(1)));
        let Ok(BackendCommand::FetchResults {
            generation,
            year,
            round,
        }) = cmd_rx.try_recv()
        else {
            panic!("expected results fetch");
        };
        assert!(app.selection().loading());

        ui_tx
            .send(UiEvent::ResultsLoaded {
                generation,
                year,
                round,
                outcome: Ok(vec![
                    result("Max", "Verstappen", 1),
                    result("Sergio", "Perez", 2),
                ]),
            })
            .expect("send");
        app.process_ui_events();

        let info = app.selection().race_info().expect("race info");
        assert_eq!(info.race_name, "Bahrain GP");
        assert_eq!(info.subtitle(), "Round: 1 | Date: 2023-03-05");
        assert_eq!(app.selection().results().len(), 2);
        assert!(app.selection().show_results_table());
    }

    #[test]
    fn full_command_queue_does_not_strand_loading() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let (ui_tx, ui_rx) = bounded(8);
        let mut app = ResultsApp::new(cmd_tx.clone(), ui_rx, StartupConfig::default());

        app.choose_year(Some(Year(2023)));
        let Ok(BackendCommand::FetchRaces { generation, year }) = cmd_rx.try_recv() else {
            panic!("expected race fetch");
        };
        ui_tx
            .send(UiEvent::RacesLoaded {
                generation,
                year,
                outcome: Ok(vec![RaceSummary {
                    round: Round(1),
                    name: "Bahrain GP".to_string(),
                }]),
            })
            .expect("send");
        app.process_ui_events();

        cmd_tx
            .send(BackendCommand::FetchRaces {
                generation: 0,
                year: Year(1990),
            })
            .expect("fill queue");
        app.choose_round(Some(Round(1)));
        assert!(!app.selection().loading());
        assert!(app.status().contains("queue is full"));
        assert!(app.selection().error().is_some());

        let _ = cmd_rx.try_recv();
        app.choose_round(Some(Round(1)));
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::FetchResults {
                round: Round(1),
                ..
            })
        ));
        assert!(app.selection().loading());
    }

    #[test]
    fn full_command_queue_lets_the_same_year_be_picked_again() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let (_ui_tx, ui_rx) = bounded(8);
        let mut app = ResultsApp::new(cmd_tx.clone(), ui_rx, StartupConfig::default());
        cmd_tx
            .send(BackendCommand::FetchRaces {
                generation: 0,
                year: Year(1990),
            })
            .expect("fill queue");

        app.choose_year(Some(Year(2023)));
        assert!(app.selection().selected_year().is_none());

        let _ = cmd_rx.try_recv();
        app.choose_year(Some(Year(2023)));
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::FetchRaces {
                year: Year(2023),
                ..
            })
        ));
    }

    #[test]
    fn clearing_year_sends_nothing() {
        let (mut app, cmd_rx, _ui_tx) = app();
        app.choose_year(None);
        app.choose_round(Some(Round(3)));
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn backend_messages_update_status_line() {
        let (mut app, _cmd_rx, ui_tx) = app();
        ui_tx
            .send(UiEvent::Info("Backend worker ready".to_string()))
            .expect("send");
        app.process_ui_events();
        assert_eq!(app.status(), "Backend worker ready");

        ui_tx
            .send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                "backend worker startup failure: invalid api url",
            )))
            .expect("send");
        app.process_ui_events();
        assert!(app.status().contains("startup failure"));
    }
}
