use serde::Deserialize;
use thiserror::Error;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("로깅 파일 로테이션(rotation)은 DAILY, HOURLY, MINUTELY, NEVER만 가능 합니다. (입력: {0})")]
    InvalidRotation(String),

    #[error("로그 레벨(level)은 TRACE, DEBUG, INFO, WARN, ERROR만 가능 합니다. (입력: {0})")]
    InvalidLevel(String),

    #[error("로그 파일을 생성할 수 없습니다: {0}")]
    AppenderInitFailed(String),

    #[error("로깅 설정에 실패 했습니다: {0}")]
    SubscriberInitFailed(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    dir: String,
    name: String,

    /// 최대 로그 파일 개수로 로그 파일이 설정한 개수보다 커질 경우 기존의 로그파일들은 삭제 된다.
    /// 설정 되지 않을 시 로그 파일은 삭제 되지 않는다.
    keep: Option<usize>,

    /// 파일과 stdout에 출력할 로그의 레벨로 지정된 로그 레벨 이상만 로깅된다.
    /// 설정하지 않을시 기본값은 DEBUG로 설정 된다.
    ///
    /// 이 값은 [`tracing::Level`]로 변환 됨으로 자세한 사항은 해당 파일을 확인
    level: Option<String>,

    /// 로깅 파일이 분리 되는 기간으로 .log 파일 하나 당 설정된 기간 동안 로그가 기록 된다.
    /// 설정 되지 않을시 기본값은 DAILY로 설정된다.
    ///
    /// 이 값은 [`rolling::Rotation`]으로 변환 됨으로 자세한 사항은 해당 파일을 확인
    rotation: Option<String>
}

/// stdout과 파일에 JSON 형식으로 로그를 기록한다.
///
/// 반환된 [`WorkerGuard`]가 drop 되면 파일 기록이 멈추므로 프로그램이 끝날 때까지 가지고 있어야 한다.
pub fn set_global_logging_config(c: &Config) -> Result<WorkerGuard, LogError> {
    let rotation = c.rotation.as_deref()
        .map(parse_rotation)
        .transpose()?
        .unwrap_or(rolling::Rotation::DAILY);
    let level = c.level.as_deref()
        .map(parse_level)
        .transpose()?
        .unwrap_or(tracing::Level::DEBUG);

    let mut file_appender = rolling::RollingFileAppender::builder()
        .filename_prefix(c.name.clone())
        .filename_suffix("log")
        .rotation(rotation);

    if let Some(keep) = c.keep {
        file_appender = file_appender.max_log_files(keep);
    }

    let file_appender = file_appender.build(c.dir.clone())
        .map_err(|e| LogError::AppenderInitFailed(e.to_string()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let writer = std::io::stdout.and(non_blocking);

    tracing_subscriber::fmt()
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_current_span(true)
        .with_span_list(true)
        .with_timer(LocalTime::new(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]")))
        .with_writer(writer)
        .with_max_level(level)
        .try_init()
        .map_err(|e| LogError::SubscriberInitFailed(e.to_string()))?;

    Ok(guard)
}

/// 로깅 설정이 없을 때 사용하며 `RUST_LOG`로 필터를 지정한다. (기본값 info)
pub fn set_stdout_logging() -> Result<(), LogError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .try_init()
        .map_err(|e| LogError::SubscriberInitFailed(e.to_string()))
}

fn parse_rotation(s: &str) -> Result<rolling::Rotation, LogError> {
    match s {
        "DAILY" => Ok(rolling::Rotation::DAILY),
        "HOURLY" => Ok(rolling::Rotation::HOURLY),
        "MINUTELY" => Ok(rolling::Rotation::MINUTELY),
        "NEVER" => Ok(rolling::Rotation::NEVER),
        _ => Err(LogError::InvalidRotation(s.to_owned())),
    }
}

fn parse_level(l: &str) -> Result<tracing::Level, LogError> {
    match l {
        "TRACE" => Ok(tracing::Level::TRACE),
        "DEBUG" => Ok(tracing::Level::DEBUG),
        "INFO" => Ok(tracing::Level::INFO),
        "WARN" => Ok(tracing::Level::WARN),
        "ERROR" => Ok(tracing::Level::ERROR),
        _ => Err(LogError::InvalidLevel(l.to_owned())),
    }
}
