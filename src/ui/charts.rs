use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::state::FileEntry;

// ---------------------------------------------------------------------------
// Sum bar chart
// ---------------------------------------------------------------------------

/// One bar per numeric column, bar height = sum of its non-missing values.
pub fn sum_bar_chart(ui: &mut Ui, entry: &FileEntry) {
    ui.strong("Column totals");
    if entry.output.column_sums.is_empty() {
        ui.label("No numeric columns available for sum visualization.");
        return;
    }

    let bars: Vec<Bar> = entry
        .output
        .column_sums
        .iter()
        .enumerate()
        .map(|(idx, (name, sum))| {
            Bar::new(idx as f64, *sum)
                .name(name)
                .fill(entry.colors.color_for(name))
                .width(0.6)
        })
        .collect();

    let names: Vec<String> = entry
        .output
        .column_sums
        .iter()
        .map(|(name, _)| name.clone())
        .collect();

    Plot::new("column_sums")
        .height(240.0)
        .include_y(0.0)
        .allow_scroll(false)
        .x_axis_formatter(move |mark: GridMark, _range| column_tick_label(&names, mark))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Label integer ticks with the column name at that position; suppress
/// everything else so fractional grid lines stay blank.
fn column_tick_label(names: &[String], mark: GridMark) -> String {
    let rounded = mark.value.round();
    if rounded < 0.0 || (mark.value - rounded).abs() > 0.01 {
        return String::new();
    }
    names.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Date line chart
// ---------------------------------------------------------------------------

/// Row count per day for the chosen date column, ascending.  Days are
/// plotted on a days-from-epoch axis and the ticks formatted back into
/// calendar dates.
pub fn date_line_chart(ui: &mut Ui, entry: &FileEntry) {
    ui.strong("Rows per day");
    let Some(counts) = &entry.output.date_counts else {
        ui.label("No suitable date columns found for date visualization.");
        return;
    };
    if counts.is_empty() {
        ui.label("No dated rows to plot.");
        return;
    }

    let points: PlotPoints = counts
        .iter()
        .map(|(date, n)| [date.num_days_from_ce() as f64, *n as f64])
        .collect();

    let column = entry.config.date_column.clone().unwrap_or_default();

    Plot::new("date_counts")
        .height(240.0)
        .include_y(0.0)
        .allow_scroll(false)
        .legend(Legend::default())
        .y_axis_label("rows")
        .x_axis_formatter(|mark: GridMark, _range| day_tick_label(mark))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name(&column).width(2.0));
        });
}

fn day_tick_label(mark: GridMark) -> String {
    let days = mark.value.round();
    if (mark.value - days).abs() > 0.01 {
        return String::new();
    }
    match NaiveDate::from_num_days_from_ce_opt(days as i32) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_ticks_only_label_whole_bars() {
        let names = vec!["a".to_string(), "b".to_string()];
        let mark = |value: f64| GridMark {
            value,
            step_size: 1.0,
        };
        assert_eq!(column_tick_label(&names, mark(0.0)), "a");
        assert_eq!(column_tick_label(&names, mark(1.0)), "b");
        assert_eq!(column_tick_label(&names, mark(0.5)), "");
        assert_eq!(column_tick_label(&names, mark(-1.0)), "");
        assert_eq!(column_tick_label(&names, mark(5.0)), "");
    }

    #[test]
    fn day_ticks_round_trip_the_epoch_offset() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let mark = GridMark {
            value: date.num_days_from_ce() as f64,
            step_size: 1.0,
        };
        assert_eq!(day_tick_label(mark), "2024-07-15");
    }
}
