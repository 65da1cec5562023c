use thiserror::Error;

/// 요청 처리 중 발생하는 에러로 종류마다 고정된 HTTP 상태 코드로 변환 된다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// 식별자 형식이 잘못 되었음 (400)
    #[error("{0}")]
    InvalidArgument(String),

    /// 요청 본문이 정의된 형태를 만족하지 않음 (422)
    #[error("{0}")]
    Validation(String),

    /// 참조한 엔티티가 존재하지 않음 (404)
    #[error("{0}")]
    NotFound(String),

    /// 이미 존재하거나 다른 엔티티가 참조 중임 (400)
    #[error("{0}")]
    Conflict(String),

    /// 외부 서비스에 연결할 수 없거나 에러를 반환 함 (503)
    #[error("{0}")]
    Unavailable(String),

    /// 분류 되지 않은 저장소/런타임 에러 (500)
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        ServiceError::InvalidArgument(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        ServiceError::Conflict(message.into())
    }

    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        ServiceError::Unavailable(message.into())
    }
}
