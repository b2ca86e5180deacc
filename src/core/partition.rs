use crate::domain::model::{BranchMap, ReportRow};

/// Sheet holding the complete cleaned table, always written first.
pub const BASE_SHEET: &str = "Base";

/// Splits rows into named sub-tables: "Base" with everything, then one
/// entry per branch in map order, matched exactly (case-sensitive, no
/// trimming) against the branch column. Rows matching no branch appear
/// only in "Base".
pub fn partition<R: ReportRow>(rows: &[R], branches: &BranchMap) -> Vec<(String, Vec<R>)> {
    let mut sheets = Vec::with_capacity(branches.len() + 1);
    sheets.push((BASE_SHEET.to_string(), rows.to_vec()));

    for entry in branches.iter() {
        let subset: Vec<R> = rows
            .iter()
            .filter(|row| row.branch() == entry.name)
            .cloned()
            .collect();
        sheets.push((entry.sheet.clone(), subset));
    }

    sheets
}
