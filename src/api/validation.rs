use super::ApiError;

pub fn require_field<'a>(name: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{} is required", name)));
    }
    Ok(trimmed)
}

pub fn validate_positive(name: &str, value: f64) -> Result<f64, ApiError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ApiError::validation(format!(
            "Invalid {}: {}. Must be greater than zero",
            name, value
        )));
    }
    Ok(value)
}

pub fn validate_count(count: i32) -> Result<i32, ApiError> {
    if count <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid count: {}. Count must be a positive integer",
            count
        )));
    }
    Ok(count)
}

/// Public ids are UUIDs; anything else is rejected before hitting the store.
pub fn validate_public_id<'a>(kind: &str, id: &'a str) -> Result<&'a str, ApiError> {
    if uuid::Uuid::parse_str(id).is_err() {
        return Err(ApiError::validation(format!("Invalid {} ID: {}", kind, id)));
    }
    Ok(id)
}

/// The `farmId` query parameter of farm-scoped create and list routes.
pub fn require_farm_id(farm_id: Option<&str>) -> Result<&str, ApiError> {
    let farm_id = require_field("farmId", farm_id.unwrap_or_default())?;
    validate_public_id("farm", farm_id)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let email = require_field("email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ApiError::validation(format!("Invalid email: {}", email))),
    }
}

/// Optional string field for partial updates: blank means "keep".
pub fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
