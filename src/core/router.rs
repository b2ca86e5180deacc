use crate::config::Settings;
use crate::core::classifier::classify;
use crate::core::pipeline::ReportPipeline;
use crate::domain::model::RecordKind;
use crate::domain::ports::{ReportSink, TableSource};
use crate::utils::error::{ReportError, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Subfolder of the inbox receiving successfully handled files.
pub const PROCESSED_DIR: &str = "Processados";
/// Subfolder of the inbox receiving failed files.
pub const ERRORS_DIR: &str = "Erros";

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Output workbook name for a processed file: kind plus timestamp.
pub fn output_file_name(kind: RecordKind, at: DateTime<Local>) -> String {
    format!("{}_{}.xlsx", kind.as_str(), at.format("%Y%m%d_%H%M%S"))
}

fn has_spreadsheet_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            SPREADSHEET_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, Default)]
pub struct PassSummary {
    pub discovered: usize,
    pub processed: usize,
    pub failed: usize,
    /// Files left in the inbox because relocation failed; retried on the
    /// next pass.
    pub deferred: usize,
}

/// Watches the inbox, classifies incoming spreadsheets, dispatches them
/// to the transform pipeline and relocates each source file according to
/// the outcome. One file is fully handled before the next is considered.
pub struct IntakeRouter<S: TableSource, K: ReportSink> {
    pipeline: ReportPipeline<S, K>,
    inbox: PathBuf,
    processed: PathBuf,
    errors: PathBuf,
    output: PathBuf,
    interval: Duration,
}

impl<S: TableSource, K: ReportSink> IntakeRouter<S, K> {
    /// Builds the router and creates the inbox/output directory layout.
    /// Directory creation failure is fatal for the whole run.
    pub fn new(pipeline: ReportPipeline<S, K>, settings: &Settings) -> Result<Self> {
        let router = Self {
            pipeline,
            inbox: settings.inbox.clone(),
            processed: settings.inbox.join(PROCESSED_DIR),
            errors: settings.inbox.join(ERRORS_DIR),
            output: settings.output.clone(),
            interval: settings.interval,
        };
        router.ensure_directories()?;
        Ok(router)
    }

    fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.inbox, &self.processed, &self.errors, &self.output] {
            fs::create_dir_all(dir)?;
            tracing::debug!("Directory ready: {}", dir.display());
        }
        Ok(())
    }

    /// Lists candidate files: direct children of the inbox root with a
    /// recognized spreadsheet extension. Files already relocated to the
    /// subfolders are never revisited.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();

        for entry in fs::read_dir(&self.inbox)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if !has_spreadsheet_extension(&path) {
                tracing::debug!("Ignoring non-spreadsheet file: {}", path.display());
                continue;
            }
            found.push(path);
        }

        found.sort();
        Ok(found)
    }

    /// Runs one discovery-and-dispatch pass. Per-file errors are caught
    /// and turned into relocations to the error folder; only discovery
    /// itself can fail the pass.
    pub fn process_pass(&self) -> Result<PassSummary> {
        let files = self.discover()?;
        let mut summary = PassSummary {
            discovered: files.len(),
            ..PassSummary::default()
        };

        if files.is_empty() {
            tracing::debug!("No new files in {}", self.inbox.display());
            return Ok(summary);
        }

        tracing::info!("Found {} new files to process", files.len());

        for path in files {
            match self.process_file(&path) {
                Ok(output) => {
                    summary.processed += 1;
                    tracing::info!("✅ {} -> {}", file_name(&path), output.display());
                }
                Err(ReportError::RelocationError { path: src, source }) => {
                    summary.deferred += 1;
                    tracing::warn!(
                        "Could not relocate {} ({}); it stays in the inbox for the next pass",
                        src.display(),
                        source
                    );
                }
                Err(err) => {
                    summary.failed += 1;
                    tracing::error!("❌ {} failed: {}", file_name(&path), err);
                    self.move_to_errors(&path);
                }
            }
        }

        Ok(summary)
    }

    /// Handles one intake file: probe, classify, run the pipeline on a
    /// temporary working copy, then commit in two phases (workbook under
    /// a temporary name, source relocated, workbook renamed into place).
    fn process_file(&self, path: &Path) -> Result<PathBuf> {
        let name = file_name(path);
        tracing::info!("Processing: {}", name);

        self.pipeline.probe(path)?;

        let kind = classify(&name).ok_or_else(|| ReportError::ClassificationUnknown {
            name: name.clone(),
        })?;
        tracing::info!("Classified {} as {}", name, kind);

        // The pipeline never touches the inbox original.
        let workdir = tempfile::tempdir()?;
        let working_copy = workdir.path().join(&name);
        fs::copy(path, &working_copy)?;

        let final_name = output_file_name(kind, Local::now());
        let staged_output = self.output.join(format!(".{}.tmp", final_name));

        if let Err(err) = self.pipeline.process(kind, &working_copy, &staged_output) {
            let _ = fs::remove_file(&staged_output);
            return Err(err);
        }

        let processed_dest = self.processed.join(&name);
        if let Err(err) = fs::rename(path, &processed_dest) {
            let _ = fs::remove_file(&staged_output);
            return Err(ReportError::RelocationError {
                path: path.to_path_buf(),
                source: err,
            });
        }

        let final_output = self.output.join(&final_name);
        fs::rename(&staged_output, &final_output)?;

        Ok(final_output)
    }

    fn move_to_errors(&self, path: &Path) {
        let dest = self.errors.join(file_name(path));
        match fs::rename(path, &dest) {
            Ok(()) => tracing::info!("Moved {} to {}", file_name(path), dest.display()),
            Err(err) => tracing::error!(
                "Could not move {} to the error folder ({}); it will be reconsidered",
                path.display(),
                err
            ),
        }
    }

    /// Single discovery-and-dispatch pass.
    pub fn run_once(&self) -> Result<PassSummary> {
        tracing::info!("One-shot processing of {}", self.inbox.display());
        let summary = self.process_pass()?;
        tracing::info!(
            "Pass complete: {} processed, {} failed, {} deferred",
            summary.processed,
            summary.failed,
            summary.deferred
        );
        Ok(summary)
    }

    /// Continuous monitoring: process, sleep, repeat, until interrupted.
    /// The interrupt is honored between cycles, so a file being handled
    /// when Ctrl-C arrives is always completed first.
    pub async fn watch(&self) -> Result<()> {
        tracing::info!(
            "Monitoring {} every {}s (output: {}); press Ctrl-C to stop",
            self.inbox.display(),
            self.interval.as_secs(),
            self.output.display()
        );

        let interrupted = Arc::new(AtomicBool::new(false));
        {
            let interrupted = interrupted.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    interrupted.store(true, Ordering::SeqCst);
                }
            });
        }

        loop {
            if let Err(err) = self.process_pass() {
                tracing::error!("Discovery pass failed: {}", err);
            }

            if interrupted.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(self.interval).await;
            if interrupted.load(Ordering::SeqCst) {
                break;
            }
        }

        tracing::info!("Monitoring stopped by interrupt");
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_output_file_name_carries_kind_and_timestamp() {
        let at = Local.with_ymd_and_hms(2025, 6, 30, 14, 5, 9).unwrap();
        assert_eq!(
            output_file_name(RecordKind::Loan, at),
            "emprestimos_20250630_140509.xlsx"
        );
        assert_eq!(
            output_file_name(RecordKind::Pending, at),
            "pendencias_20250630_140509.xlsx"
        );
    }

    #[test]
    fn test_spreadsheet_extension_check() {
        assert!(has_spreadsheet_extension(Path::new("a.xlsx")));
        assert!(has_spreadsheet_extension(Path::new("a.XLS")));
        assert!(!has_spreadsheet_extension(Path::new("a.txt")));
        assert!(!has_spreadsheet_extension(Path::new("relatorio")));
    }
}
