//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;
use fixhub_shared::AppError;

pub mod health;
pub mod reports;
pub mod settlement;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(reports::routes())
        .merge(settlement::routes())
}

/// Translates an [`AppError`] into its JSON response.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string()
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rstest::rstest;

    use fixhub_shared::AppError;

    use super::error_response;

    #[rstest]
    #[case(AppError::NotFound("branch".into()), StatusCode::NOT_FOUND)]
    #[case(AppError::Validation("bad range".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::Conflict("duplicate".into()), StatusCode::CONFLICT)]
    #[case(AppError::Database("load failed".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::Internal("oops".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_error_response_carries_the_error_status(
        #[case] err: AppError,
        #[case] expected: StatusCode,
    ) {
        let response = error_response(&err);
        assert_eq!(response.status(), expected);
    }
}
