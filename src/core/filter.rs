use crate::domain::model::ReportRow;

/// True when an email cell holds no usable address: null cells are read
/// as the empty string, and the literal text "nan" guards against inputs
/// that went through a tool serializing nulls as text.
pub fn is_blank_email(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    normalized.is_empty() || normalized == "nan"
}

/// Drops rows with a blank email. Returns the number of rows removed.
pub fn require_email<R: ReportRow>(rows: &mut Vec<R>) -> usize {
    let before = rows.len();
    rows.retain(|row| !is_blank_email(row.email()));
    before - rows.len()
}

/// Drops rows where the accessed field equals `value` exactly. Returns
/// the number of rows removed.
pub fn exclude_value<R, F>(rows: &mut Vec<R>, value: &str, field: F) -> usize
where
    R: ReportRow,
    F: Fn(&R) -> &str,
{
    let before = rows.len();
    rows.retain(|row| field(row) != value);
    before - rows.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{LoanRow, EXCLUDED_CLERK};

    fn loan(email: &str, clerk: &str) -> LoanRow {
        LoanRow {
            person: "Maria".to_string(),
            gender: "F".to_string(),
            branch: "Biblioteca Campus II".to_string(),
            email: email.to_string(),
            clerk: clerk.to_string(),
        }
    }

    #[test]
    fn test_blank_email_detection() {
        assert!(is_blank_email(""));
        assert!(is_blank_email("   "));
        assert!(is_blank_email("nan"));
        assert!(is_blank_email("NaN"));
        assert!(is_blank_email("  nan  "));
        assert!(!is_blank_email("a@b.com"));
    }

    #[test]
    fn test_require_email_drops_blank_rows() {
        let mut rows = vec![loan("a@b.com", "Ana"), loan("", "Ana"), loan("nan", "Ana")];

        let removed = require_email(&mut rows);

        assert_eq!(removed, 2);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email, "a@b.com");
    }

    #[test]
    fn test_exclude_value_is_exact_match() {
        let mut rows = vec![
            loan("a@b.com", EXCLUDED_CLERK),
            loan("b@b.com", "bibinternet"),
            loan("c@b.com", "Ana"),
        ];

        let removed = exclude_value(&mut rows, EXCLUDED_CLERK, |r| r.clerk.as_str());

        assert_eq!(removed, 1);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.clerk != EXCLUDED_CLERK));
    }
}
