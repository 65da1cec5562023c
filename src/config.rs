pub mod database;
pub mod log;
pub mod server;
pub mod user_service;

use crate::config::database::Database;
use serde::Deserialize;
use std::env;

/// 환경 변수로 설정을 덮어쓸 때 사용하는 접두어로 `LIBRARY__DB__HOST`와 같이 사용한다.
const ENV_PREFIX: &str = "LIBRARY";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    server: server::Config,
    db: Database,
    user_service: user_service::Config,
    logger: Option<log::Config>,
}

impl AppConfig {
    pub fn server(&self) -> &server::Config {
        &self.server
    }

    pub fn server_mut(&mut self) -> &mut server::Config {
        &mut self.server
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn user_service(&self) -> &user_service::Config {
        &self.user_service
    }

    pub fn logger(&self) -> Option<&log::Config> {
        self.logger.as_ref()
    }
}

/// 실행 환경에 따라 .env 파일을 로드한다.
pub fn load_dotenv() {
    let env_filename = env::var("RUN_MODE")
        .map(|env| format!(".env.{}", env))
        .unwrap_or_else(|_| ".env".into());

    dotenvy::from_filename(env_filename).ok();
}

/// 기본값, `config/{RUN_MODE}.json`, `LIBRARY__` 환경 변수 순서로 설정을 덮어쓴다.
///
/// `USER_SERVICE_URL`, `DATABASE_URL` 환경 변수는 가장 우선한다.
pub fn load_config() -> Result<AppConfig, config::ConfigError> {
    let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
    builder(&env)?
        .build()?
        .try_deserialize()
}

fn builder(run_mode: &str) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8002)?
        .set_default("db.host", "localhost")?
        .set_default("db.port", 5432)?
        .set_default("db.username", "postgres")?
        .set_default("db.password", "postgres")?
        .set_default("db.dbname", "library")?
        .set_default("user_service.url", user_service::DEFAULT_USER_SERVICE_URL)?
        .add_source(config::File::with_name(&format!("config/{}.json", run_mode)).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .set_override_option("user_service.url", env::var("USER_SERVICE_URL").ok())?
        .set_override_option("db.url", env::var("DATABASE_URL").ok())
}
