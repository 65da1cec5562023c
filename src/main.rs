use clap::Parser;
use library_service::api::{self, AppState};
use library_service::config;
use library_service::config::database::{connect_to_database, Database};
use library_service::library::repo::{DieselRepository, MemoryRepository};
use library_service::user;
use std::process::exit;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "library-service", version, about = "개인 서재 관리 서비스")]
struct Cli {
    /// 설정된 바인드 주소를 덮어쓴다.
    #[arg(long)]
    host: Option<String>,

    /// 설정된 포트를 덮어쓴다.
    #[arg(long)]
    port: Option<u16>,

    /// PostgreSQL 대신 메모리 저장소를 사용한다. 프로세스가 종료되면 데이터는 사라진다.
    #[arg(long)]
    in_memory: bool,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error("데이터베이스 연결 풀을 생성할 수 없습니다: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("스키마를 초기화할 수 없습니다: {0}")]
    Schema(#[from] library_service::library::RepositoryError),

    #[error("사용자 서비스 클라이언트를 생성할 수 없습니다: {0}")]
    UserService(#[from] user::ClientBuildError),

    #[error("{0}")]
    Join(#[from] tokio::task::JoinError),
}

/// 사용자 서비스 설정(URL, 타임아웃)을 검증하고 정규화된 기본 URL을 반환한다.
///
/// blocking 클라이언트를 생성하므로 블로킹 스레드에서 호출해야 한다.
fn check_user_service(config: &config::user_service::Config) -> Result<String, StartupError> {
    let client = user::new_client(config)?;
    Ok(client.base_url().to_string())
}

fn open_repository(db: &Database) -> Result<DieselRepository, StartupError> {
    let pool = connect_to_database(db)?;
    let repository = DieselRepository::new(pool);
    repository.initialize_schema()?;
    Ok(repository)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("종료 시그널을 수신할 수 없습니다: {}", e);
    }
    info!("서버를 종료 합니다.");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    config::load_dotenv();
    let mut app_config = config::load_config()
        .unwrap_or_else(|e| {
            eprintln!("설정을 읽을 수 없습니다: {}", e);
            exit(1);
        });

    let _log_guard = match app_config.logger() {
        Some(logger) => match config::log::set_global_logging_config(logger) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("{}", e);
                exit(1);
            }
        },
        None => {
            if let Err(e) = config::log::set_stdout_logging() {
                eprintln!("{}", e);
                exit(1);
            }
            None
        }
    };

    app_config.server_mut().override_with(cli.host, cli.port);

    let app = if cli.in_memory {
        info!("메모리 저장소로 실행 합니다.");
        api::router(AppState::new(Arc::new(MemoryRepository::new())))
    } else {
        let db = app_config.db().clone();
        let repository = tokio::task::spawn_blocking(move || open_repository(&db))
            .await
            .map_err(StartupError::from)
            .and_then(|r| r)
            .unwrap_or_else(|e| {
                error!("{}", e);
                exit(1);
            });
        api::router(AppState::new(Arc::new(repository)))
    };

    let user_service = app_config.user_service().clone();
    let user_service_url = tokio::task::spawn_blocking(move || check_user_service(&user_service))
        .await
        .map_err(StartupError::from)
        .and_then(|r| r)
        .unwrap_or_else(|e| {
            error!("{}", e);
            exit(1);
        });

    let address = app_config.server().address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .unwrap_or_else(|e| {
            error!("{}에 바인드할 수 없습니다: {}", address, e);
            exit(1);
        });

    info!("library service listening on {} (user service: {})", address, user_service_url);
    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        error!("서버 실행 중 에러가 발생 했습니다: {}", e);
        exit(1);
    }
}
