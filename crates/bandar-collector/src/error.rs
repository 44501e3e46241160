//! 에러 타입 정의.

use bandar_analytics::AnalyticsError;
use bandar_core::CoreError;
use bandar_storage::StorageError;
use thiserror::Error;

/// Collector 에러 타입
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 블롭 저장소 에러
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// 스케줄러 로그 데이터베이스 에러
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSV/도메인 에러
    #[error("Data error: {0}")]
    Core(#[from] CoreError),

    /// 계산 에러
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    /// 스케줄러 로그 에러
    #[error("Job log error: {0}")]
    JobLog(String),
}

impl From<config::ConfigError> for CollectorError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
