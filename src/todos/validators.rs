use super::models::{CreateTodoRequest, UpdateTodoRequest};
use crate::common::validation::{require_text, validate_date_format};
use crate::common::{ApiError, ValidationResult, Validator};

fn validate_fields(
    category_id: i64,
    title: &str,
    content: &str,
    color: &str,
    is_priority: Option<bool>,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    if category_id < 1 {
        result.add_error("category_id", "must be at least 1");
    }
    require_text(&mut result, "title", title, 255);
    require_text(&mut result, "content", content, 10_000);
    require_text(&mut result, "color", color, 32);
    if is_priority.is_none() {
        result.add_error("is_priority", "is required");
    }

    result
}

impl Validator<CreateTodoRequest> for CreateTodoRequest {
    fn validate(&self, data: &CreateTodoRequest) -> ValidationResult {
        validate_fields(
            data.category_id,
            &data.title,
            &data.content,
            &data.color,
            data.is_priority,
        )
    }
}

impl Validator<UpdateTodoRequest> for UpdateTodoRequest {
    fn validate(&self, data: &UpdateTodoRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        if data.todo_id < 1 {
            result.add_error("todo_id", "must be at least 1");
        }
        result.merge(validate_fields(
            data.category_id,
            &data.title,
            &data.content,
            &data.color,
            data.is_priority,
        ));
        result
    }
}

/// Field checks first, then the `YYYY-MM-DD` date, which has its own message.
pub fn check_todo_input<T: Validator<T>>(request: &T, date: &str) -> Result<(), ApiError> {
    let validation = request.validate(request);
    if !validation.is_valid {
        return Err(validation.into());
    }
    if validate_date_format(date).is_none() {
        return Err(ApiError::ValidationError("invalid-date".to_string()));
    }
    Ok(())
}
