use crate::error::ServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

/// [`ServiceError`]를 `{"detail": ...}` 응답으로 변환한다.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self.0 {
            ServiceError::Internal(message) => {
                error!("요청 처리 중 에러가 발생 했습니다. => {}", message);
                INTERNAL_ERROR.to_owned()
            }
            err => err.to_string(),
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_fixed_status() {
        let cases = [
            (ServiceError::invalid_argument("x"), StatusCode::BAD_REQUEST),
            (ServiceError::validation("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::not_found("x"), StatusCode::NOT_FOUND),
            (ServiceError::conflict("x"), StatusCode::BAD_REQUEST),
            (ServiceError::unavailable("x"), StatusCode::SERVICE_UNAVAILABLE),
            (ServiceError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError(err).into_response().status(), status);
        }
    }
}
