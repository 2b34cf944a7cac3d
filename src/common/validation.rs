// Common validation types and traits

use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::MIN_PAGE_SIZE;

#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
            self.errors.extend(other.errors);
        }
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T) -> ValidationResult;
}

/// `?page_id=&page_size=` query shared by the list endpoints
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page_id: i64,
    pub page_size: i64,
}

/// LIMIT/OFFSET pair handed to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

/// Validates paging bounds against the configured maximum page size.
pub struct PageValidator {
    pub max_page_size: i64,
}

impl Validator<PageQuery> for PageValidator {
    fn validate(&self, data: &PageQuery) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.page_id < 1 {
            result.add_error("page_id", "must be at least 1");
        } else if data.offset().is_none() {
            result.add_error("page_id", "is out of range");
        }
        if data.page_size < MIN_PAGE_SIZE || data.page_size > self.max_page_size {
            result.add_error(
                "page_size",
                &format!(
                    "must be between {} and {}",
                    MIN_PAGE_SIZE, self.max_page_size
                ),
            );
        }

        result
    }
}

impl PageQuery {
    fn offset(&self) -> Option<i64> {
        self.page_id
            .checked_sub(1)
            .and_then(|skipped| skipped.checked_mul(self.page_size))
    }

    /// Only meaningful after `PageValidator` has accepted the query
    pub fn page(&self) -> Page {
        Page {
            limit: self.page_size,
            offset: self.offset().unwrap_or(i64::MAX),
        }
    }
}

/// Checks a required string field is present and not blank.
pub fn require_text(result: &mut ValidationResult, field: &str, value: &str, max_len: usize) {
    if value.trim().is_empty() {
        result.add_error(field, "is required");
    } else if value.chars().count() > max_len {
        result.add_error(field, &format!("must be at most {} characters", max_len));
    }
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Zero-padded `YYYY-MM-DD` only, so stored dates sort as text.
pub fn validate_date_format(date_str: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).ok()?;
    (date.format(DATE_FORMAT).to_string() == date_str).then_some(date)
}
