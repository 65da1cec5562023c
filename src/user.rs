use crate::config::user_service::Config;
use crate::error::ServiceError;
use reqwest::blocking;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::{debug, error, warn};

const USER_NOT_FOUND: &str = "User not found";
const USER_SERVICE_UNAVAILABLE: &str = "User service is unavailable";
const USER_SERVICE_UNREACHABLE: &str = "Could not connect to user service";

/// 사용자 서비스가 반환한 사용자 정보로 내용은 해석하지 않는다.
pub type UserRecord = serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("invalid user service url {0}: {1}")]
    InvalidBaseUrl(String, String),

    #[error("failed to build http client: {0}")]
    ClientBuildFailed(String),
}

/// `GET {base}/api/v1/users/{user_id}`를 한 번 호출하며 재시도 하지 않는다.
pub struct Client {
    base_url: Url,
    client: blocking::Client,
}

pub fn new_client(config: &Config) -> Result<Client, ClientBuildError> {
    let base_url = Url::parse(config.url())
        .map_err(|e| ClientBuildError::InvalidBaseUrl(config.url().to_owned(), e.to_string()))?;
    if base_url.cannot_be_a_base() {
        return Err(ClientBuildError::InvalidBaseUrl(config.url().to_owned(), "cannot be a base".to_owned()));
    }

    let mut builder = blocking::Client::builder();
    if let Some(timeout) = config.timeout_secs() {
        builder = builder.timeout(Duration::from_secs(timeout));
    }
    let client = builder.build()
        .map_err(|e| ClientBuildError::ClientBuildFailed(e.to_string()))?;

    Ok(Client { base_url, client })
}

impl Client {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn user_url(&self, user_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty()
                .extend(["api", "v1", "users", user_id]);
        }
        url
    }

    pub fn find_user(&self, user_id: &str) -> Result<UserRecord, ServiceError> {
        let url = self.user_url(user_id);
        debug!("사용자 조회 요청: {}", url);

        let response = self.client.get(url)
            .send()
            .map_err(|e| {
                error!("사용자 서비스에 연결할 수 없습니다. (USER: {}, ERROR: {:?})", user_id, e);
                ServiceError::unavailable(USER_SERVICE_UNREACHABLE)
            })?;

        match response.status() {
            StatusCode::OK => response.json::<UserRecord>()
                .map_err(|e| {
                    error!("사용자 서비스 응답을 해석할 수 없습니다. (USER: {}, ERROR: {:?})", user_id, e);
                    ServiceError::unavailable(USER_SERVICE_UNAVAILABLE)
                }),
            StatusCode::NOT_FOUND => Err(ServiceError::not_found(USER_NOT_FOUND)),
            status => {
                warn!("사용자 서비스가 {}를 반환 했습니다. (USER: {})", status, user_id);
                Err(ServiceError::unavailable(USER_SERVICE_UNAVAILABLE))
            }
        }
    }
}
