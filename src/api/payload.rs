use crate::api::error::ApiError;
use crate::error::ServiceError;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

/// JSON 요청 본문 추출기
///
/// 본문이 비어 있으면 `{}`로 해석하여 기본값이 있는 필드는 기본값으로 채운다.
/// 해석에 실패하면 422로 응답한다.
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError(ServiceError::validation(e.body_text())))?;

        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(body)
            .map(Payload)
            .map_err(|e| ApiError(ServiceError::validation(e.to_string())))
    }
}
