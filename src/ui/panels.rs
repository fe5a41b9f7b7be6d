use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::excel_file_name;
use crate::state::{AppState, Status};
use crate::ui::{charts, table};

// ---------------------------------------------------------------------------
// Left side panel – processing controls
// ---------------------------------------------------------------------------

/// Render the per-file processing controls.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Processing");
    ui.separator();

    if state.active_file().is_none() {
        ui.label("No file loaded.");
        return;
    }

    // Status updates and dialogs happen after the entry borrow ends.
    let mut pending_status: Option<Status> = None;
    let mut export_requested = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let Some(entry) = state.active_file_mut() else {
                return;
            };

            // ---- Cleaning toggle ----
            let mut clean = entry.config.clean;
            if ui
                .checkbox(&mut clean, format!("Clean data for {}", entry.name))
                .changed()
            {
                entry.set_clean(clean);
                if clean {
                    pending_status = Some(Status::Info("Data cleaning applied!".to_string()));
                }
            }
            ui.separator();

            // ---- Columns to keep ----
            let columns = entry.original.column_names();
            let kept = columns.iter().filter(|c| entry.is_kept(c)).count();
            egui::CollapsingHeader::new(
                RichText::new(format!("Columns  ({kept}/{})", columns.len())).strong(),
            )
            .id_salt("keep_columns")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    entry.keep_all();
                }
                for col in &columns {
                    let mut checked = entry.is_kept(col);
                    if ui.checkbox(&mut checked, col).changed() {
                        entry.toggle_keep(col);
                    }
                }
            });

            // ---- Numeric conversion ----
            let visible: Vec<String> = columns
                .iter()
                .filter(|c| entry.is_kept(c))
                .cloned()
                .collect();
            egui::CollapsingHeader::new(
                RichText::new(format!(
                    "Convert to numeric  ({})",
                    entry.config.numeric_columns.len()
                ))
                .strong(),
            )
            .id_salt("numeric_columns")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        entry.numeric_all();
                    }
                    if ui.small_button("None").clicked() {
                        entry.clear_numeric();
                    }
                });
                for col in &visible {
                    let mut checked = entry.is_numeric_target(col);
                    if ui.checkbox(&mut checked, col).changed() {
                        entry.toggle_numeric(col);
                    }
                }
            });

            // ---- Date axis ----
            let candidates = entry.output.date_candidates.clone();
            if !candidates.is_empty() {
                ui.separator();
                ui.strong("Date column");
                let current = entry.config.date_column.clone().unwrap_or_default();
                egui::ComboBox::from_id_salt("date_column")
                    .selected_text(&current)
                    .show_ui(ui, |ui: &mut Ui| {
                        for col in &candidates {
                            if ui.selectable_label(current == *col, col).clicked() {
                                entry.set_date_column(col.clone());
                            }
                        }
                    });
            }

            // ---- Excel export ----
            if entry.can_export() {
                ui.separator();
                if ui.button("Convert to Excel…").clicked() {
                    export_requested = true;
                }
            }
        });

    if export_requested {
        export_dialog(state);
    }
    if let Some(status) = pending_status {
        state.status = Some(status);
    }
}

// ---------------------------------------------------------------------------
// Central panel – preview and charts
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(entry) = state.active_file() else {
        welcome(ui);
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let dataset = &entry.output.dataset;
            ui.heading(&entry.name);
            ui.label(format!(
                "{} rows, {} columns",
                dataset.row_count(),
                dataset.column_count()
            ));
            ui.add_space(8.0);

            table::preview_table(ui, dataset);

            ui.add_space(12.0);
            ui.separator();
            charts::sum_bar_chart(ui, entry);

            ui.add_space(12.0);
            ui.separator();
            charts::date_line_chart(ui, entry);
        });
}

fn welcome(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(48.0);
        ui.heading("Data Sweeper");
        ui.label(
            "Transform your files between CSV and Excel formats with built-in \
             data cleaning, column selection, conversion, visualization, and more!",
        );
        ui.add_space(8.0);
        ui.label("Please upload a CSV or Excel file.");
        ui.weak("File → Open…");
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar: file menu, one tab per open file, and the
/// status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let mut switch_to = None;
        for (idx, entry) in state.files.iter().enumerate() {
            if ui
                .selectable_label(idx == state.active, &entry.name)
                .clicked()
            {
                switch_to = Some(idx);
            }
        }
        if let Some(idx) = switch_to {
            state.active = idx;
        }

        if let Some(status) = &state.status {
            ui.separator();
            match status {
                Status::Info(msg) => {
                    ui.label(RichText::new(msg).color(Color32::from_rgb(60, 170, 90)))
                }
                Status::Error(msg) => ui.label(RichText::new(msg).color(Color32::RED)),
            };
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open data files")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_files();

    if let Some(paths) = files {
        state.open_files(&paths);
    }
}

fn export_dialog(state: &mut AppState) {
    let Some(entry) = state.active_file() else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Save Excel workbook")
        .set_file_name(excel_file_name(&entry.name))
        .add_filter("Excel workbook", &["xlsx"])
        .save_file();

    if let Some(path) = file {
        state.export_active(&path);
    }
}
