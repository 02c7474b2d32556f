use crate::errors::{ApiError, ServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::ValidationError(format!("Validation failed: {}", e)))
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Quantity {
        #[validate(range(min = 1))]
        value: u32,
    }

    #[test]
    fn validate_input_maps_to_api_validation_error() {
        let err = validate_input(&Quantity { value: 0 }).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(msg) if msg.contains("value")));
        assert!(validate_input(&Quantity { value: 3 }).is_ok());
    }

    #[test]
    fn response_helpers_use_expected_status() {
        assert_eq!(success_response("ok").status(), StatusCode::OK);
        assert_eq!(created_response("ok").status(), StatusCode::CREATED);
        assert_eq!(no_content_response().status(), StatusCode::NO_CONTENT);
    }
}
