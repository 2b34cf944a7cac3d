use super::models::{CreateUserRequest, LoginUserRequest};
use crate::common::validation::require_text;
use crate::common::{ValidationResult, Validator};

pub const MIN_PASSWORD_LENGTH: usize = 6;

impl Validator<CreateUserRequest> for CreateUserRequest {
    fn validate(&self, data: &CreateUserRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        require_text(&mut result, "name", &data.name, 255);
        require_text(&mut result, "address", &data.address, 500);
        result.merge(validate_email(&data.email));
        result.merge(validate_password(&data.password));

        if data.pic.len() > 2048 {
            result.add_error("pic", "must be at most 2048 characters");
        }

        result
    }
}

impl Validator<LoginUserRequest> for LoginUserRequest {
    fn validate(&self, data: &LoginUserRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.merge(validate_email(&data.email));
        result.merge(validate_password(&data.password));
        result
    }
}

/// Loose structural check: one `@`, a non-empty local part and a dotted domain
pub fn validate_email(email: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if email.trim().is_empty() {
        result.add_error("email", "is required");
        return result;
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !well_formed {
        result.add_error("email", "must be a valid email address");
    } else if email.len() > 255 {
        result.add_error("email", "must be at most 255 characters");
    }

    result
}

pub fn validate_password(password: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        result.add_error(
            "password",
            &format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    }
    result
}
