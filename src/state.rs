use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::color::ColorMap;
use crate::data::export::to_xlsx_bytes;
use crate::data::loader::{load_file, LoadedFile, SourceFormat};
use crate::data::model::Dataset;
use crate::data::pipeline::{process, PipelineConfig, PipelineOutput};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Status line shown in the top bar.
#[derive(Debug, Clone)]
pub enum Status {
    Info(String),
    Error(String),
}

/// One opened file: the untouched parse result, the user's processing
/// choices, and everything derived from them.
pub struct FileEntry {
    pub name: String,
    pub format: SourceFormat,
    pub original: Dataset,
    pub config: PipelineConfig,
    pub output: PipelineOutput,
    pub colors: ColorMap,
}

impl FileEntry {
    fn new(loaded: LoadedFile) -> Self {
        let config = PipelineConfig {
            keep_columns: loaded.dataset.column_names(),
            ..PipelineConfig::default()
        };
        let mut entry = FileEntry {
            name: loaded.name,
            format: loaded.format,
            original: loaded.dataset,
            config,
            output: PipelineOutput::default(),
            colors: ColorMap::default(),
        };
        entry.reprocess();
        entry
    }

    /// Re-run the pipeline after a config change.  A missing or stale date
    /// selection snaps to the first remaining candidate, the way a select
    /// box with no empty entry would.
    pub fn reprocess(&mut self) {
        let mut output = process(&self.original, &self.config);

        let selection_valid = match &self.config.date_column {
            Some(sel) => output.date_candidates.contains(sel),
            None => output.date_candidates.is_empty(),
        };
        if !selection_valid {
            self.config.date_column = output.date_candidates.first().cloned();
            output = process(&self.original, &self.config);
        }

        let sum_names: Vec<String> = output
            .column_sums
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        self.colors = ColorMap::new(&sum_names);
        self.output = output;
    }

    /// Excel export only makes sense for files that did not start as one.
    pub fn can_export(&self) -> bool {
        self.format == SourceFormat::Csv
    }

    /// Whether a column is currently kept.  An empty keep list means
    /// everything is.
    pub fn is_kept(&self, name: &str) -> bool {
        self.config.keep_columns.is_empty() || self.config.keep_columns.iter().any(|c| c == name)
    }

    /// Flip one column's kept state, preserving the dataset's column order
    /// in the keep list.
    pub fn toggle_keep(&mut self, name: &str) {
        let was_kept = self.is_kept(name);
        let base = if self.config.keep_columns.is_empty() {
            self.original.column_names()
        } else {
            self.config.keep_columns.clone()
        };
        self.config.keep_columns = self
            .original
            .column_names()
            .into_iter()
            .filter(|c| if c == name { !was_kept } else { base.contains(c) })
            .collect();
        self.reprocess();
    }

    /// Keep every column again.
    pub fn keep_all(&mut self) {
        self.config.keep_columns = self.original.column_names();
        self.reprocess();
    }

    pub fn is_numeric_target(&self, name: &str) -> bool {
        self.config.numeric_columns.iter().any(|c| c == name)
    }

    /// Mark every kept column for numeric conversion.
    pub fn numeric_all(&mut self) {
        self.config.numeric_columns = if self.config.keep_columns.is_empty() {
            self.original.column_names()
        } else {
            self.config.keep_columns.clone()
        };
        self.reprocess();
    }

    /// Flip one column's numeric-conversion flag.
    pub fn toggle_numeric(&mut self, name: &str) {
        if let Some(pos) = self.config.numeric_columns.iter().position(|c| c == name) {
            self.config.numeric_columns.remove(pos);
        } else {
            self.config.numeric_columns.push(name.to_string());
        }
        self.reprocess();
    }

    pub fn clear_numeric(&mut self) {
        self.config.numeric_columns.clear();
        self.reprocess();
    }

    pub fn set_clean(&mut self, clean: bool) {
        if self.config.clean != clean {
            self.config.clean = clean;
            self.reprocess();
        }
    }

    pub fn set_date_column(&mut self, column: String) {
        if self.config.date_column.as_deref() != Some(column.as_str()) {
            self.config.date_column = Some(column);
            self.reprocess();
        }
    }
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Every opened file, in open order.
    pub files: Vec<FileEntry>,
    /// Index into `files` of the file shown in the panels.
    pub active: usize,
    /// Status / error message shown in the UI.
    pub status: Option<Status>,
}

impl AppState {
    pub fn active_file(&self) -> Option<&FileEntry> {
        self.files.get(self.active)
    }

    pub fn active_file_mut(&mut self) -> Option<&mut FileEntry> {
        self.files.get_mut(self.active)
    }

    /// Load each path in turn.  A file that fails leaves the others alone;
    /// the status line keeps whatever happened last.
    pub fn open_files(&mut self, paths: &[PathBuf]) {
        for path in paths {
            match load_file(path) {
                Ok(loaded) => {
                    log::info!(
                        "Loaded {}: {} rows, {} columns",
                        loaded.name,
                        loaded.dataset.row_count(),
                        loaded.dataset.column_count()
                    );
                    self.status = Some(Status::Info(
                        match loaded.format {
                            SourceFormat::Csv => "CSV file loaded successfully!",
                            SourceFormat::Excel => "Excel file loaded successfully!",
                        }
                        .to_string(),
                    ));
                    self.files.push(FileEntry::new(loaded));
                    self.active = self.files.len() - 1;
                }
                Err(err) => {
                    log::error!("Failed to load {}: {err}", path.display());
                    self.status = Some(Status::Error(err.to_string()));
                }
            }
        }
    }

    /// Write the active file's processed dataset as an `.xlsx` workbook.
    /// Serializes the pre-date-coercion snapshot: the workbook reflects
    /// cleaning, selection, and numeric conversion, never the chart axis.
    pub fn export_active(&mut self, path: &Path) {
        let Some(entry) = self.files.get(self.active) else {
            return;
        };
        match write_workbook(&entry.output.export_dataset, path) {
            Ok(()) => {
                log::info!("Exported {} to {}", entry.name, path.display());
                self.status = Some(Status::Info(format!("Saved {}", path.display())));
            }
            Err(err) => {
                log::error!("Export of {} failed: {err:#}", entry.name);
                self.status = Some(Status::Error(format!("{err:#}")));
            }
        }
    }
}

fn write_workbook(dataset: &Dataset, path: &Path) -> anyhow::Result<()> {
    let bytes = to_xlsx_bytes(dataset)?;
    std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
