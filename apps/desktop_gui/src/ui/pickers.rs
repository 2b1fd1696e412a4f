//! Year and race pickers. Both are stateless: they render the current choice
//! and report a new one, leaving the reaction to the controller.

use eframe::egui;
use shared::{
    domain::{Round, Year},
    protocol::RaceSummary,
};

pub const YEAR_PLACEHOLDER: &str = "-- Select a Year --";
pub const RACE_PLACEHOLDER: &str = "-- Select a Race --";

pub fn year_label(year: Option<Year>) -> String {
    year.map(|year| year.to_string())
        .unwrap_or_else(|| YEAR_PLACEHOLDER.to_string())
}

pub fn race_label(races: &[RaceSummary], round: Option<Round>) -> String {
    round
        .and_then(|round| races.iter().find(|race| race.round == round))
        .map(RaceSummary::label)
        .unwrap_or_else(|| RACE_PLACEHOLDER.to_string())
}

pub fn race_picker_enabled(races: &[RaceSummary]) -> bool {
    !races.is_empty()
}

/// Returns `Some(choice)` when the user picked something other than `selected`.
pub fn year_picker(
    ui: &mut egui::Ui,
    years: &[Year],
    selected: Option<Year>,
) -> Option<Option<Year>> {
    let mut choice = selected;
    ui.horizontal(|ui| {
        ui.label("Year:");
        egui::ComboBox::from_id_salt("year_picker")
            .selected_text(year_label(selected))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut choice, None, YEAR_PLACEHOLDER);
                for year in years {
                    ui.selectable_value(&mut choice, Some(*year), year.to_string());
                }
            });
    });
    (choice != selected).then_some(choice)
}

/// Disabled until the selected season's race list has arrived.
pub fn race_picker(
    ui: &mut egui::Ui,
    races: &[RaceSummary],
    selected: Option<Round>,
) -> Option<Option<Round>> {
    let mut choice = selected;
    ui.horizontal(|ui| {
        ui.label("Race:");
        ui.add_enabled_ui(race_picker_enabled(races), |ui| {
            egui::ComboBox::from_id_salt("race_picker")
                .selected_text(race_label(races, selected))
                .width(280.0)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut choice, None, RACE_PLACEHOLDER);
                    for race in races {
                        ui.selectable_value(&mut choice, Some(race.round), race.label());
                    }
                });
        });
    });
    (choice != selected).then_some(choice)
}
