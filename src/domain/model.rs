use crate::utils::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const COL_PERSON: &str = "Nome da pessoa";
pub const COL_GENDER: &str = "Gênero";
pub const COL_BRANCH: &str = "Nome da biblioteca";
pub const COL_EMAIL: &str = "Email";
pub const COL_CLERK: &str = "Nome pessoa empréstimo";
pub const COL_LOAN_DATE: &str = "Data de empréstimo";
pub const COL_DUE_DATE: &str = "Data devolução prevista";
pub const COL_TITLE: &str = "Título";

/// Loan-clerk value marking internal circulation records, dropped during cleaning.
pub const EXCLUDED_CLERK: &str = "Bibinternet";

/// Gender code replacements applied to loan rows. Unmapped values pass through.
pub const GENDER_MAP: &[(&str, &str)] = &[("M", "o"), ("F", "a")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Loan,
    Pending,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Loan => "emprestimos",
            RecordKind::Pending => "pendencias",
        }
    }

    /// Columns that must be present in the input spreadsheet for this kind.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            RecordKind::Loan => &[COL_PERSON, COL_GENDER, COL_BRANCH, COL_EMAIL, COL_CLERK],
            RecordKind::Pending => &[
                COL_PERSON,
                COL_EMAIL,
                COL_LOAN_DATE,
                COL_DUE_DATE,
                COL_TITLE,
                COL_BRANCH,
            ],
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw spreadsheet contents as read from disk: a header row and stringly
/// data rows. Exists only at the load boundary; typed rows are built from
/// it exactly once, after column validation.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Resolves the given column names to indices, in order. All names
    /// must be present; the error lists every missing column at once.
    pub fn require_columns(&self, required: &[&str]) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(required.len());
        let mut missing = Vec::new();

        for name in required {
            match self.headers.iter().position(|h| h == name) {
                Some(idx) => indices.push(idx),
                None => missing.push((*name).to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ReportError::ColumnMissing { columns: missing });
        }

        Ok(indices)
    }
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}

/// Shared shape of a typed report row: field access for the pipeline
/// stages plus projection to output headers and cells.
pub trait ReportRow: Clone + Sized {
    const KIND: RecordKind;

    /// Output column headers, in output order.
    fn headers() -> &'static [&'static str];

    /// Builds typed rows from a raw table, validating required columns once.
    fn from_raw(table: &RawTable) -> Result<Vec<Self>>;

    /// Output cells, aligned with `headers()`. Also the identity used for
    /// duplicate removal: two rows are duplicates when their cells match.
    fn cells(&self) -> Vec<String>;

    fn person(&self) -> &str;
    fn person_mut(&mut self) -> &mut String;
    fn email(&self) -> &str;
    fn email_mut(&mut self) -> &mut String;
    fn branch(&self) -> &str;
}

/// A cleaned loan record. The clerk field drives filtering but is not
/// part of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanRow {
    pub person: String,
    pub gender: String,
    pub branch: String,
    pub email: String,
    pub clerk: String,
}

impl ReportRow for LoanRow {
    const KIND: RecordKind = RecordKind::Loan;

    fn headers() -> &'static [&'static str] {
        &[COL_PERSON, COL_GENDER, COL_BRANCH, COL_EMAIL]
    }

    fn from_raw(table: &RawTable) -> Result<Vec<Self>> {
        let idx = table.require_columns(Self::KIND.required_columns())?;
        Ok(table
            .rows
            .iter()
            .map(|row| LoanRow {
                person: cell(row, idx[0]),
                gender: cell(row, idx[1]),
                branch: cell(row, idx[2]),
                email: cell(row, idx[3]),
                clerk: cell(row, idx[4]),
            })
            .collect())
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.person.clone(),
            self.gender.clone(),
            self.branch.clone(),
            self.email.clone(),
        ]
    }

    fn person(&self) -> &str {
        &self.person
    }

    fn person_mut(&mut self) -> &mut String {
        &mut self.person
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn email_mut(&mut self) -> &mut String {
        &mut self.email
    }

    fn branch(&self) -> &str {
        &self.branch
    }
}

/// A cleaned pending-return record. Output column order differs from the
/// input order: the title moves ahead of the dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRow {
    pub person: String,
    pub email: String,
    pub title: String,
    pub loan_date: String,
    pub due_date: String,
    pub branch: String,
}

impl ReportRow for PendingRow {
    const KIND: RecordKind = RecordKind::Pending;

    fn headers() -> &'static [&'static str] {
        &[
            COL_PERSON,
            COL_EMAIL,
            COL_TITLE,
            COL_LOAN_DATE,
            COL_DUE_DATE,
            COL_BRANCH,
        ]
    }

    fn from_raw(table: &RawTable) -> Result<Vec<Self>> {
        let idx = table.require_columns(Self::KIND.required_columns())?;
        Ok(table
            .rows
            .iter()
            .map(|row| PendingRow {
                person: cell(row, idx[0]),
                email: cell(row, idx[1]),
                loan_date: cell(row, idx[2]),
                due_date: cell(row, idx[3]),
                title: cell(row, idx[4]),
                branch: cell(row, idx[5]),
            })
            .collect())
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.person.clone(),
            self.email.clone(),
            self.title.clone(),
            self.loan_date.clone(),
            self.due_date.clone(),
            self.branch.clone(),
        ]
    }

    fn person(&self) -> &str {
        &self.person
    }

    fn person_mut(&mut self) -> &mut String {
        &mut self.person
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn email_mut(&mut self) -> &mut String {
        &mut self.email
    }

    fn branch(&self) -> &str {
        &self.branch
    }
}

/// One output sheet label and the canonical branch name its rows must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchEntry {
    pub sheet: String,
    pub name: String,
}

/// Ordered mapping of sheet labels to canonical branch names. The order
/// here is the order of the partitioned sheets in the output workbook.
#[derive(Debug, Clone)]
pub struct BranchMap {
    entries: Vec<BranchEntry>,
}

impl BranchMap {
    pub fn new(entries: Vec<BranchEntry>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BranchEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BranchMap {
    fn default() -> Self {
        Self::new(vec![
            BranchEntry {
                sheet: "Unidade 1".to_string(),
                name: "Biblioteca Campus I - Unid. 1".to_string(),
            },
            BranchEntry {
                sheet: "Unidade 2".to_string(),
                name: "Biblioteca Campus I - Unid. 2".to_string(),
            },
            BranchEntry {
                sheet: "Campus II".to_string(),
                name: "Biblioteca Campus II".to_string(),
            },
        ])
    }
}

/// A single output worksheet: header row plus data rows.
#[derive(Debug, Clone)]
pub struct ReportSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The output workbook handed to the report sink, sheets in write order.
#[derive(Debug, Clone, Default)]
pub struct ReportBook {
    pub sheets: Vec<ReportSheet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan_table() -> RawTable {
        RawTable {
            headers: vec![
                "Matrícula".to_string(),
                COL_PERSON.to_string(),
                COL_GENDER.to_string(),
                COL_BRANCH.to_string(),
                COL_EMAIL.to_string(),
                COL_CLERK.to_string(),
            ],
            rows: vec![vec![
                "123".to_string(),
                "Maria Silva".to_string(),
                "F".to_string(),
                "Biblioteca Campus II".to_string(),
                "m@x.com".to_string(),
                "Ana".to_string(),
            ]],
        }
    }

    #[test]
    fn test_loan_from_raw_selects_columns_by_name() {
        let rows = LoanRow::from_raw(&loan_table()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].person, "Maria Silva");
        assert_eq!(rows[0].gender, "F");
        assert_eq!(rows[0].email, "m@x.com");
        assert_eq!(rows[0].clerk, "Ana");
    }

    #[test]
    fn test_loan_cells_drop_clerk_column() {
        let rows = LoanRow::from_raw(&loan_table()).unwrap();

        assert_eq!(
            rows[0].cells(),
            vec!["Maria Silva", "F", "Biblioteca Campus II", "m@x.com"]
        );
        assert_eq!(LoanRow::headers().len(), 4);
    }

    #[test]
    fn test_missing_columns_are_all_reported() {
        let table = RawTable {
            headers: vec![COL_PERSON.to_string(), COL_EMAIL.to_string()],
            rows: vec![],
        };

        let err = LoanRow::from_raw(&table).unwrap_err();
        match err {
            crate::utils::error::ReportError::ColumnMissing { columns } => {
                assert_eq!(columns, vec![COL_GENDER, COL_BRANCH, COL_CLERK]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_pending_output_order_moves_title_before_dates() {
        let table = RawTable {
            headers: RecordKind::Pending
                .required_columns()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: vec![vec![
                "João Paulo".to_string(),
                "j@x.com".to_string(),
                "01/06/2025".to_string(),
                "15/06/2025".to_string(),
                "Dom Casmurro".to_string(),
                "Biblioteca Campus II".to_string(),
            ]],
        };

        let rows = PendingRow::from_raw(&table).unwrap();
        assert_eq!(
            rows[0].cells(),
            vec![
                "João Paulo",
                "j@x.com",
                "Dom Casmurro",
                "01/06/2025",
                "15/06/2025",
                "Biblioteca Campus II"
            ]
        );
    }

    #[test]
    fn test_short_rows_fill_with_empty_cells() {
        let mut table = loan_table();
        table.rows = vec![vec!["123".to_string(), "Maria".to_string()]];

        let rows = LoanRow::from_raw(&table).unwrap();
        assert_eq!(rows[0].person, "Maria");
        assert_eq!(rows[0].email, "");
    }

    #[test]
    fn test_default_branch_map_order() {
        let branches = BranchMap::default();
        let sheets: Vec<&str> = branches.iter().map(|e| e.sheet.as_str()).collect();
        assert_eq!(sheets, vec!["Unidade 1", "Unidade 2", "Campus II"]);
    }
}
