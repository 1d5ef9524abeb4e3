use eframe::egui::{self, Color32, Key, RichText, ScrollArea, Ui};

use crate::data::registry::SPREADSHEET_EXTENSIONS;
use crate::state::{AppState, SearchMode};

// ---------------------------------------------------------------------------
// Top bar – file management
// ---------------------------------------------------------------------------

/// Render the top toolbar: add files, pick the active file, status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Add files…").clicked() {
            add_files_dialog(state);
        }

        ui.separator();

        if state.files.is_empty() {
            ui.label("No files yet — add a spreadsheet to get started.");
        } else {
            ui.label("File:");
            let current = state.selected_file.clone().unwrap_or_default();
            let mut picked: Option<String> = None;
            egui::ComboBox::from_id_salt("file_select")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for entry in &state.files {
                        if ui
                            .selectable_label(current == entry.name, &entry.name)
                            .clicked()
                        {
                            picked = Some(entry.name.clone());
                        }
                    }
                });
            if let Some(name) = picked {
                if state.selected_file.as_deref() != Some(name.as_str()) {
                    state.select_file(name);
                }
            }
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – search controls
// ---------------------------------------------------------------------------

/// Render the search controls: mode, sheet selection, filter inputs.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Search");
    ui.separator();

    if state.selected_file.is_none() {
        ui.label("Select a file to search.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut state.mode, SearchMode::SingleSheet, "One sheet");
        ui.radio_value(&mut state.mode, SearchMode::AllSheets, "All sheets");
    });
    ui.separator();

    match state.mode {
        SearchMode::SingleSheet => single_sheet_controls(ui, state),
        SearchMode::AllSheets => all_sheets_controls(ui, state),
    }
}

fn single_sheet_controls(ui: &mut Ui, state: &mut AppState) {
    if state.sheets.is_empty() {
        ui.label("No sheets available.");
        return;
    }

    ui.label("Sheet:");
    let current = state.selected_sheet.clone().unwrap_or_default();
    let mut picked: Option<String> = None;
    egui::ComboBox::from_id_salt("sheet_select")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for sheet in &state.sheets {
                if ui.selectable_label(current == *sheet, sheet).clicked() {
                    picked = Some(sheet.clone());
                }
            }
        });
    if let Some(sheet) = picked {
        if state.selected_sheet.as_deref() != Some(sheet.as_str()) {
            state.select_sheet(sheet);
        }
    }

    ui.separator();
    ui.strong("Filter by column");
    ui.add_space(4.0);

    // One text input per column; empty means no constraint on that column.
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let mut submit = false;
            for col in &state.filter_columns {
                ui.label(col);
                if let Some(value) = state.filters.get_mut(col) {
                    let response = ui.text_edit_singleline(value);
                    if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                        submit = true;
                    }
                }
                ui.add_space(2.0);
            }

            ui.add_space(6.0);
            if ui.button("Search").clicked() {
                submit = true;
            }
            if submit {
                state.run_single_sheet_search();
            }
        });
}

fn all_sheets_controls(ui: &mut Ui, state: &mut AppState) {
    ui.label("Search every sheet for:");
    let response = ui.text_edit_singleline(&mut state.query);
    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

    ui.add_space(6.0);
    if ui.button("Search").clicked() || submitted {
        state.run_all_sheets_search();
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn add_files_dialog(state: &mut AppState) {
    let picked = rfd::FileDialog::new()
        .set_title("Add spreadsheet files")
        .add_filter("Spreadsheets", SPREADSHEET_EXTENSIONS)
        .pick_files();

    if let Some(paths) = picked {
        state.add_files(paths);
    }
}
