//! Results table and the driver details shown while hovering a row.

use eframe::egui;
use egui_extras::{Column, TableBuilder};
use shared::protocol::ResultRow;

pub const COLUMNS: [&str; 7] = [
    "Finishing Place",
    "Driver",
    "Constructor",
    "Grid",
    "Position",
    "Status",
    "Points",
];

pub fn row_cells(index: usize, row: &ResultRow) -> [String; 7] {
    [
        (index + 1).to_string(),
        row.driver.full_name(),
        row.constructor.name.clone(),
        row.grid.to_string(),
        row.position_label(),
        row.status.clone(),
        row.points_label(),
    ]
}

/// Label/value pairs for the hover tooltip. Missing upstream values render as
/// `N/A`.
pub fn driver_details(row: &ResultRow) -> Vec<(&'static str, String)> {
    let or_na = |value: &str| {
        if value.trim().is_empty() {
            "N/A".to_string()
        } else {
            value.to_string()
        }
    };

    vec![
        ("Name", row.driver.full_name()),
        ("Nationality", or_na(&row.driver.nationality)),
        ("Date of Birth", or_na(&row.driver.date_of_birth)),
        (
            "Permanent Number",
            row.driver
                .permanent_number
                .map(|number| number.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        ("Constructor", row.constructor.name.clone()),
        ("Grid Position", row.grid.to_string()),
        (
            "Laps Completed",
            row.laps
                .map(|laps| laps.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        ("Status", row.status.clone()),
        (
            "Fastest Lap",
            row.fastest_lap_time().unwrap_or("N/A").to_string(),
        ),
        (
            "Fastest Lap Avg Speed",
            row.fastest_lap_speed().unwrap_or_else(|| "N/A".to_string()),
        ),
    ]
}

/// Draws the table and returns the hovered row index with the pointer position.
pub fn show(ui: &mut egui::Ui, rows: &[ResultRow]) -> Option<(usize, egui::Pos2)> {
    let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;
    let mut hovered = None;

    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .min_scrolled_height(0.0)
        .vscroll(true);
    for title in COLUMNS {
        let column = match title {
            "Driver" | "Constructor" | "Status" => {
                Column::initial(170.0).at_least(90.0).clip(true)
            }
            _ => Column::auto().at_least(50.0),
        };
        builder = builder.column(column);
    }

    builder
        .header(20.0, |mut header| {
            for title in COLUMNS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(text_height, rows.len(), |mut row| {
                let index = row.index();
                let Some(result) = rows.get(index) else {
                    return;
                };
                for cell in row_cells(index, result) {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
                if let Some(pos) = row.response().hover_pos() {
                    hovered = Some((index, pos));
                }
            });
        });

    hovered
}

pub fn show_driver_tooltip(ctx: &egui::Context, position: egui::Pos2, row: &ResultRow) {
    egui::Area::new(egui::Id::new("driver_details_tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(position)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(300.0);
                ui.heading("Driver Details");
                ui.separator();
                egui::Grid::new("driver_details_grid")
                    .num_columns(2)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for (label, value) in driver_details(row) {
                            ui.strong(format!("{label}:"));
                            ui.label(value);
                            ui.end_row();
                        }
                    });
            });
        });
}
