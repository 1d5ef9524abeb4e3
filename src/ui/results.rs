use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel – search results
// ---------------------------------------------------------------------------

/// Render the result table in the central panel.
pub fn results_panel(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.results else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Pick a file, set your filters, and hit Search.");
        });
        return;
    };

    if report.table.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No matching rows.");
        });
        return;
    }

    ui.heading(format!("Found {} matching rows", report.total));
    ui.separator();

    let table = &report.table;
    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(60.0), table.columns.len())
            .header(20.0, |mut header| {
                for col in &table.columns {
                    header.col(|ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.len(), |mut row| {
                    let cells = &table.rows[row.index()];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell.to_string());
                        });
                    }
                });
            });
    });
}
