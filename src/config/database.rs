use crate::library::repo::DbPool;
use diesel::r2d2::ConnectionManager;
use diesel::PgConnection;
use r2d2::Pool;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    host: String,
    port: i32,
    username: String,
    password: String,
    dbname: String,

    /// 설정되어 있으면 다른 항목 대신 이 접속 URL을 사용한다.
    url: Option<String>,

    /// 커넥션 풀의 최대 크기로 설정하지 않으면 r2d2 기본값(10)을 사용한다.
    pool_size: Option<u32>,
}

impl Database {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> i32 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn dbname(&self) -> &str {
        &self.dbname
    }

    pub fn pool_size(&self) -> Option<u32> {
        self.pool_size
    }

    pub fn url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("postgres://{}:{}@{}:{}/{}", self.username, self.password, self.host, self.port, self.dbname),
        }
    }
}

/// 데이터베이스 연결 풀을 생성한다.
pub fn connect_to_database(db: &Database) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<PgConnection>::new(db.url());

    let mut builder = Pool::builder()
        .test_on_check_out(true);
    if let Some(size) = db.pool_size() {
        builder = builder.max_size(size);
    }
    builder.build(manager)
}
