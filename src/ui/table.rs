use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Dataset;

/// Virtualized grid over the processed dataset.  Null cells render blank,
/// the way a spreadsheet would show them.
pub fn preview_table(ui: &mut Ui, dataset: &Dataset) {
    ui.strong("Data Preview");
    if dataset.columns.is_empty() {
        ui.label("No columns to show.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(TableColumn::auto().at_least(60.0), dataset.column_count())
        .max_scroll_height(300.0)
        .header(20.0, |mut header| {
            for column in &dataset.columns {
                header.col(|ui| {
                    ui.strong(format!("{} ({})", column.name, column.ty));
                });
            }
        })
        .body(|mut body| {
            body.rows(18.0, dataset.row_count(), |mut row| {
                let row_idx = row.index();
                for column in &dataset.columns {
                    row.col(|ui| {
                        let value = &column.values[row_idx];
                        if !value.is_null() {
                            ui.label(value.to_string());
                        }
                    });
                }
            });
        });
}
