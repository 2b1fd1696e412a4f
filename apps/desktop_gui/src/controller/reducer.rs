//! Season/race selection state and the reactions to selection changes.
//!
//! Every selection change returns the fetch it needs (if any) instead of
//! performing it, and bumps a generation counter. Responses are applied only
//! when their generation matches the current one, so a slow response for an
//! old selection can never overwrite newer state.

use egui::Pos2;
use shared::{
    domain::{selectable_years, Round, Year},
    protocol::{RaceInfo, RaceSummary, ResultRow},
};
use tracing::{debug, warn};

use crate::{backend_bridge::commands::BackendCommand, controller::events::UiError};

pub const NO_RESULTS_MESSAGE: &str = "No results found";
pub const TOOLTIP_HEIGHT: f32 = 200.0;
pub const TOOLTIP_OFFSET: f32 = 10.0;

/// Places the driver tooltip next to the cursor, flipping it above the cursor
/// when it would run past the bottom of the viewport.
pub fn tooltip_position(cursor: Pos2, viewport_height: f32) -> Pos2 {
    let y = if cursor.y + TOOLTIP_HEIGHT + TOOLTIP_OFFSET > viewport_height {
        cursor.y - TOOLTIP_HEIGHT - TOOLTIP_OFFSET
    } else {
        cursor.y + TOOLTIP_OFFSET
    };
    Pos2::new(cursor.x + TOOLTIP_OFFSET, y)
}

#[derive(Debug, Clone)]
pub struct SelectionState {
    years: Vec<Year>,
    selected_year: Option<Year>,
    races: Vec<RaceSummary>,
    selected_round: Option<Round>,
    race_info: Option<RaceInfo>,
    results: Vec<ResultRow>,
    loading: bool,
    error: Option<String>,
    hovered_row: Option<usize>,
    tooltip_position: Pos2,
    races_generation: u64,
    results_generation: u64,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            years: selectable_years(),
            selected_year: None,
            races: Vec::new(),
            selected_round: None,
            race_info: None,
            results: Vec::new(),
            loading: false,
            error: None,
            hovered_row: None,
            tooltip_position: Pos2::ZERO,
            races_generation: 0,
            results_generation: 0,
        }
    }

    pub fn years(&self) -> &[Year] {
        &self.years
    }

    pub fn selected_year(&self) -> Option<Year> {
        self.selected_year
    }

    pub fn races(&self) -> &[RaceSummary] {
        &self.races
    }

    pub fn selected_round(&self) -> Option<Round> {
        self.selected_round
    }

    pub fn race_info(&self) -> Option<&RaceInfo> {
        self.race_info.as_ref()
    }

    pub fn results(&self) -> &[ResultRow] {
        &self.results
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn hovered_row(&self) -> Option<usize> {
        self.hovered_row
    }

    pub fn hovered_result(&self) -> Option<&ResultRow> {
        self.hovered_row.and_then(|index| self.results.get(index))
    }

    pub fn tooltip_position(&self) -> Pos2 {
        self.tooltip_position
    }

    pub fn race_picker_enabled(&self) -> bool {
        !self.races.is_empty()
    }

    pub fn show_results_table(&self) -> bool {
        !self.results.is_empty() && !self.loading && self.error.is_none()
    }

    /// Year change. Clears everything that depends on the year before any
    /// response can arrive, then asks for the season's races.
    pub fn select_year(&mut self, year: Option<Year>) -> Option<BackendCommand> {
        if year == self.selected_year {
            return None;
        }
        self.selected_year = year;
        self.races_generation += 1;
        self.races.clear();
        self.reset_round_selection();

        year.map(|year| BackendCommand::FetchRaces {
            generation: self.races_generation,
            year,
        })
    }

    pub fn apply_races(
        &mut self,
        generation: u64,
        year: Year,
        outcome: Result<Vec<RaceSummary>, UiError>,
    ) {
        if generation != self.races_generation {
            debug!(
                year = year.0,
                generation,
                current = self.races_generation,
                "discarding stale race list"
            );
            return;
        }

        match outcome {
            Ok(races) => {
                debug!(year = year.0, count = races.len(), "fetched races");
                self.races = races;
            }
            Err(err) => {
                warn!(year = year.0, error = err.message(), "race list fetch failed");
                self.races.clear();
            }
        }
        self.reset_round_selection();
    }

    /// Round change. Asks for results only when both year and round are set.
    pub fn select_round(&mut self, round: Option<Round>) -> Option<BackendCommand> {
        if round == self.selected_round {
            return None;
        }
        self.selected_round = round;
        self.supersede_results();

        let (Some(year), Some(round)) = (self.selected_year, round) else {
            return None;
        };
        self.loading = true;
        Some(BackendCommand::FetchResults {
            generation: self.results_generation,
            year,
            round,
        })
    }

    pub fn apply_results(
        &mut self,
        generation: u64,
        year: Year,
        round: Round,
        outcome: Result<Vec<ResultRow>, UiError>,
    ) {
        if generation != self.results_generation {
            debug!(
                year = year.0,
                round = round.0,
                generation,
                current = self.results_generation,
                "discarding stale results"
            );
            return;
        }

        self.loading = false;
        match outcome {
            Ok(rows) if rows.is_empty() => {
                self.race_info = None;
                self.results.clear();
                self.error = Some(NO_RESULTS_MESSAGE.to_string());
            }
            Ok(rows) => {
                self.race_info = RaceInfo::from_results(&rows);
                self.results = rows;
                self.error = None;
            }
            Err(err) => {
                self.race_info = None;
                self.results.clear();
                self.error = Some(err.message().to_string());
            }
        }
    }

    /// `cmd` was produced by a selection change but never reached the backend.
    /// Applies the matching failure and forgets the pick so making it again
    /// issues a fresh request.
    pub fn request_not_sent(&mut self, cmd: BackendCommand, reason: &str) {
        match cmd {
            BackendCommand::FetchRaces { generation, year } => {
                if generation != self.races_generation {
                    return;
                }
                warn!(year = year.0, reason, "race list request was not sent");
                self.selected_year = None;
                self.races.clear();
                self.reset_round_selection();
            }
            BackendCommand::FetchResults {
                generation,
                year,
                round,
            } => {
                if generation != self.results_generation {
                    return;
                }
                warn!(year = year.0, round = round.0, reason, "results request was not sent");
                self.selected_round = None;
                self.results_generation += 1;
                self.loading = false;
                self.error = Some(format!("Failed to fetch results: {reason}"));
            }
        }
    }

    /// Pointer entered or moved over a result row.
    pub fn hover_row(&mut self, index: usize, pointer: Pos2, viewport_height: f32) {
        if index >= self.results.len() {
            self.clear_hover();
            return;
        }
        self.hovered_row = Some(index);
        self.tooltip_position = tooltip_position(pointer, viewport_height);
    }

    pub fn clear_hover(&mut self) {
        self.hovered_row = None;
    }

    fn reset_round_selection(&mut self) {
        self.selected_round = None;
        self.supersede_results();
    }

    /// Invalidates any in-flight results request and clears what it would
    /// have populated.
    fn supersede_results(&mut self) {
        self.results_generation += 1;
        self.race_info = None;
        self.results.clear();
        self.loading = false;
        self.error = None;
        self.clear_hover();
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
