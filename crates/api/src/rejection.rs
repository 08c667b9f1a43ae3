use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tower_auth_models::{AuthError, ErrorShape};

/// Error response carrying the `{"detail": ...}` body clients expect.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorShape,
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self {
            status: StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: e.to_error_shape(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            // Unreadable bodies keep their own status (413 for oversize).
            JsonRejection::BytesRejection(_) => rejection.status(),
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self {
            status,
            body: ErrorShape { detail: rejection.body_text() },
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            // Missing or malformed query parameters are validation failures.
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorShape { detail: rejection.body_text() },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// `Json` whose rejections use the API error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query` whose rejections use the API error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
