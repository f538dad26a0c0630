use serde::{Deserialize, Serialize};

use crate::models::{BillRecord, BillStatus, DEFAULT_PCT};

/// Raw values of the new-bill form fields, captured once at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillForm {
    /// `expense-type`
    pub expense_type: String,
    /// `expense-name`
    pub name: String,
    pub amount: String,
    /// `datepicker`
    pub date: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

impl BillForm {
    /// Builds the pending record for `email`. The attachment fields are left
    /// empty; they are filled from the upload response.
    pub fn to_record(&self, email: &str) -> BillRecord {
        BillRecord {
            id: None,
            email: email.to_string(),
            expense_type: self.expense_type.clone(),
            name: self.name.clone(),
            amount: parse_int(&self.amount),
            date: self.date.clone(),
            vat: self.vat.clone(),
            pct: parse_int(&self.pct)
                .filter(|pct| *pct > 0)
                .unwrap_or(DEFAULT_PCT),
            commentary: self.commentary.clone(),
            file_url: None,
            file_name: None,
            status: BillStatus::Pending,
        }
    }
}

/// A file picked in the receipt input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }
}

/// The parts of the page the submission flow drives directly.
pub trait FormSurface: Send + Sync {
    /// Blocking, user-facing warning.
    fn warn(&self, message: &str);
    fn clear_file_input(&self);
    fn set_submit_enabled(&self, enabled: bool);
}

/// Base-10 integer prefix parse: leading whitespace is skipped, an optional
/// sign is honoured and parsing stops at the first non-digit. Returns `None`
/// when no digit is found or the value does not fit in an `i64`.
pub fn parse_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let value: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> BillForm {
        BillForm {
            expense_type: "Transports".to_string(),
            name: "Vol Paris Londres".to_string(),
            amount: "348".to_string(),
            date: "2004-04-04".to_string(),
            vat: "70".to_string(),
            pct: "20".to_string(),
            commentary: "".to_string(),
        }
    }

    #[test]
    fn parse_int_reads_leading_integer() {
        assert_eq!(parse_int("348"), Some(348));
        assert_eq!(parse_int("  42abc"), Some(42));
        assert_eq!(parse_int("12.9"), Some(12));
        assert_eq!(parse_int("-7"), Some(-7));
        assert_eq!(parse_int("+7"), Some(7));
    }

    #[test]
    fn parse_int_rejects_non_numeric_input() {
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("99999999999999999999999"), None);
    }

    #[test]
    fn record_is_pending_with_parsed_numbers() {
        let record = form().to_record("a@a");
        assert_eq!(record.email, "a@a");
        assert_eq!(record.amount, Some(348));
        assert_eq!(record.pct, 20);
        assert_eq!(record.status, BillStatus::Pending);
        assert!(record.id.is_none());
        assert!(record.file_url.is_none());
    }

    #[test]
    fn malformed_amount_is_kept_as_none() {
        let record = BillForm {
            amount: "cent".to_string(),
            ..form()
        }
        .to_record("a@a");
        assert_eq!(record.amount, None);
    }

    #[test]
    fn pct_defaults_to_twenty() {
        for raw in ["", "abc", "0", "-5"] {
            let record = BillForm {
                pct: raw.to_string(),
                ..form()
            }
            .to_record("a@a");
            assert_eq!(record.pct, DEFAULT_PCT, "pct input {raw:?}");
        }

        let record = BillForm {
            pct: "10".to_string(),
            ..form()
        }
        .to_record("a@a");
        assert_eq!(record.pct, 10);
    }
}
