use crate::domain::model::{LoanRow, ReportRow};
use std::collections::HashSet;

/// Rewrites each person name as the title-cased first name only:
/// "MARIA SILVA" becomes "Maria". Compound names are intentionally not
/// special-cased. Idempotent.
pub fn normalize_names<R: ReportRow>(rows: &mut [R]) {
    for row in rows.iter_mut() {
        let formatted = first_name(row.person());
        *row.person_mut() = formatted;
    }
}

fn first_name(raw: &str) -> String {
    title_case(raw)
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Lower-cases then capitalizes the first letter of each alphabetic run,
/// accents preserved ("joão paulo" -> "João Paulo").
fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;

    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }

    out
}

/// Replaces exact-match gender codes; values outside the map pass through.
pub fn normalize_gender(rows: &mut [LoanRow], map: &[(&str, &str)]) {
    for row in rows.iter_mut() {
        if let Some((_, replacement)) = map.iter().find(|(code, _)| row.gender == *code) {
            row.gender = (*replacement).to_string();
        }
    }
}

/// Rewrites comma-separated multi-address cells to "; " separation so
/// they survive spreadsheet-style comma lists.
pub fn normalize_emails<R: ReportRow>(rows: &mut [R]) {
    for row in rows.iter_mut() {
        if row.email().contains(',') {
            let separated = row.email().replace(',', "; ");
            *row.email_mut() = separated;
        }
    }
}

/// Removes rows identical across all retained columns; the first
/// occurrence survives and row order is otherwise preserved. Returns the
/// number of rows removed.
pub fn dedupe<R: ReportRow>(rows: &mut Vec<R>) -> usize {
    let before = rows.len();
    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(row.cells()));
    before - rows.len()
}

/// Stable sort by person name.
pub fn sort_by_person<R: ReportRow>(rows: &mut [R]) {
    rows.sort_by(|a, b| a.person().cmp(b.person()));
}
