use super::models::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::common::validation::require_text;
use crate::common::{ValidationResult, Validator};

impl Validator<CreateCategoryRequest> for CreateCategoryRequest {
    fn validate(&self, data: &CreateCategoryRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        require_text(&mut result, "name", &data.name, 100);
        require_text(&mut result, "color", &data.color, 32);
        result
    }
}

impl Validator<UpdateCategoryRequest> for UpdateCategoryRequest {
    fn validate(&self, data: &UpdateCategoryRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        if data.category_id < 1 {
            result.add_error("category_id", "must be at least 1");
        }
        require_text(&mut result, "name", &data.name, 100);
        require_text(&mut result, "color", &data.color, 32);
        result
    }
}
