use crate::domain::model::RecordKind;

const LOAN_KEYWORDS: &[&str] = &[
    "emprestimo",
    "emprestimos",
    "empréstimo",
    "empréstimos",
    "loan",
    "loans",
];

const PENDING_KEYWORDS: &[&str] = &[
    "pendencia",
    "pendencias",
    "pendência",
    "pendências",
    "pending",
    "overdue",
];

/// Classifies a file by keyword containment in its lower-cased name.
/// Loan keywords are checked first, so a name matching both sets
/// classifies as loan. Returns `None` when neither set matches.
pub fn classify(filename: &str) -> Option<RecordKind> {
    let name = filename.to_lowercase();

    if LOAN_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
        return Some(RecordKind::Loan);
    }
    if PENDING_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
        return Some(RecordKind::Pending);
    }

    None
}
