//! Per-field validation for the structured document.
//!
//! Failures are reported as a list of [`FieldError`]s, one per offending
//! field, never as a single opaque error. Validation gates *save*: an
//! entry may be draft-invalid while it is being edited, but a document
//! with validation errors is rejected before it reaches the store.

use chrono::NaiveDate;
use serde::Serialize;

use crate::document::{Document, Entry, Section, PRESENT};

/// One validation failure, addressed to a specific field
/// (e.g. `experience[0].end_date`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Parses a month-input value (`YYYY-MM`) to the first day of that month.
fn parse_month(value: &str) -> Option<NaiveDate> {
    let (year, month) = value.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Validates one entry. `prefix` addresses the entry within its section,
/// e.g. `experience[2]`.
pub fn validate_entry(prefix: &str, entry: &Entry) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if entry.title.trim().is_empty() {
        errors.push(FieldError::new(
            format!("{prefix}.title"),
            "Title is required",
        ));
    }
    if entry.organization.trim().is_empty() {
        errors.push(FieldError::new(
            format!("{prefix}.organization"),
            "Organization is required",
        ));
    }

    let start = entry.start_date.trim();
    let end = entry.end_date.trim();

    let start_parsed = if start.is_empty() {
        None
    } else {
        let parsed = parse_month(start);
        if parsed.is_none() {
            errors.push(FieldError::new(
                format!("{prefix}.start_date"),
                "Start date must use the YYYY-MM format",
            ));
        }
        parsed
    };

    if !end.is_empty() && end != PRESENT {
        match parse_month(end) {
            None => errors.push(FieldError::new(
                format!("{prefix}.end_date"),
                format!("End date must use the YYYY-MM format or \"{PRESENT}\""),
            )),
            // A single-month engagement (start == end) is valid.
            Some(end_parsed) => {
                if let Some(start_parsed) = start_parsed {
                    if start_parsed > end_parsed {
                        errors.push(FieldError::new(
                            format!("{prefix}.end_date"),
                            "End date precedes start date",
                        ));
                    }
                }
            }
        }
    }

    errors
}

/// Validates every entry in every section, plus the contact email shape.
/// An empty result means the document may be saved.
pub fn validate_document(doc: &Document) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(email) = doc.contact_info.email.as_deref() {
        let email = email.trim();
        if !email.is_empty() && !email.contains('@') {
            errors.push(FieldError::new(
                "contact_info.email",
                "Email address is not valid",
            ));
        }
    }

    for section in [Section::Experience, Section::Education, Section::Projects] {
        for (i, entry) in doc.entries(section).iter().enumerate() {
            errors.extend(validate_entry(&format!("{}[{i}]", section.as_str()), entry));
        }
    }

    errors
}
