use crate::core::{filter, normalize, partition::partition};
use crate::domain::model::{
    BranchMap, LoanRow, PendingRow, RecordKind, ReportBook, ReportRow, ReportSheet, EXCLUDED_CLERK,
    GENDER_MAP,
};
use crate::domain::ports::{ReportSink, TableSource};
use crate::utils::error::Result;
use std::path::Path;

/// Per-kind cleaning strategy: which filters and normalizers run, and in
/// which order. Implemented on the row type so the pipeline itself stays
/// a single generic function.
pub trait CleanRows: ReportRow {
    fn clean(rows: &mut Vec<Self>);
}

impl CleanRows for LoanRow {
    fn clean(rows: &mut Vec<Self>) {
        let no_email = filter::require_email(rows);
        let internal = filter::exclude_value(rows, EXCLUDED_CLERK, |row| row.clerk.as_str());
        let duplicates = normalize::dedupe(rows);
        tracing::info!(
            "Removed {} rows without email, {} internal loans, {} duplicates",
            no_email,
            internal,
            duplicates
        );

        normalize::sort_by_person(rows);
        normalize::normalize_names(rows);
        normalize::normalize_gender(rows, GENDER_MAP);
        normalize::normalize_emails(rows);
    }
}

impl CleanRows for PendingRow {
    fn clean(rows: &mut Vec<Self>) {
        let no_email = filter::require_email(rows);
        tracing::info!("Removed {} rows without email", no_email);

        normalize::sort_by_person(rows);
        normalize::normalize_names(rows);
        normalize::normalize_emails(rows);
    }
}

#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub kind: RecordKind,
    pub rows_loaded: usize,
    pub rows_kept: usize,
    pub sheets: usize,
}

/// The transform pipeline: load -> validate/type -> clean -> partition
/// -> write. Input and output paths are explicit arguments on every
/// call; the pipeline holds no per-file state.
pub struct ReportPipeline<S: TableSource, K: ReportSink> {
    source: S,
    sink: K,
    branches: BranchMap,
}

impl<S: TableSource, K: ReportSink> ReportPipeline<S, K> {
    pub fn new(source: S, sink: K, branches: BranchMap) -> Self {
        Self {
            source,
            sink,
            branches,
        }
    }

    /// Structural check on an input file, without running the pipeline.
    pub fn probe(&self, path: &Path) -> Result<()> {
        self.source.probe(path)
    }

    pub fn process(&self, kind: RecordKind, input: &Path, output: &Path) -> Result<PipelineSummary> {
        match kind {
            RecordKind::Loan => self.run::<LoanRow>(kind, input, output),
            RecordKind::Pending => self.run::<PendingRow>(kind, input, output),
        }
    }

    fn run<R: CleanRows>(
        &self,
        kind: RecordKind,
        input: &Path,
        output: &Path,
    ) -> Result<PipelineSummary> {
        tracing::info!("Loading {} data from {}", kind, input.display());
        let raw = self.source.read_table(input)?;
        let mut rows = R::from_raw(&raw)?;
        let rows_loaded = rows.len();
        tracing::info!("Loaded {} records", rows_loaded);

        R::clean(&mut rows);
        let rows_kept = rows.len();

        let parts = partition(&rows, &self.branches);
        for (name, subset) in &parts {
            tracing::info!("{}: {} records", name, subset.len());
        }

        let book = build_book::<R>(parts);
        self.sink.write_book(output, &book)?;
        tracing::info!("Workbook saved to {}", output.display());

        Ok(PipelineSummary {
            kind,
            rows_loaded,
            rows_kept,
            sheets: book.sheets.len(),
        })
    }
}

fn build_book<R: ReportRow>(parts: Vec<(String, Vec<R>)>) -> ReportBook {
    let headers: Vec<String> = R::headers().iter().map(|h| h.to_string()).collect();
    ReportBook {
        sheets: parts
            .into_iter()
            .map(|(name, rows)| ReportSheet {
                name,
                headers: headers.clone(),
                rows: rows.iter().map(|row| row.cells()).collect(),
            })
            .collect(),
    }
}
