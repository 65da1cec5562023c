use serde::Deserialize;

pub const DEFAULT_USER_SERVICE_URL: &str = "http://user_service:8001";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    url: String,

    /// 요청 타임아웃(초)으로 설정하지 않으면 HTTP 클라이언트 기본값을 따른다.
    timeout_secs: Option<u64>,
}

impl Config {
    pub fn new(url: String, timeout_secs: Option<u64>) -> Self {
        Self { url, timeout_secs }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        self.timeout_secs
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_USER_SERVICE_URL.to_owned(), None)
    }
}
