//! 저장소 모듈 오류 타입.

use bandar_core::CoreError;
use thiserror::Error;

/// 저장소 관련 오류.
#[derive(Debug, Error)]
pub enum StorageError {
    /// 블롭을 찾을 수 없음
    #[error("Blob not found: {0}")]
    NotFound(String),

    /// 잘못된 블롭 경로
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// 입출력 오류
    #[error("I/O error: {0}")]
    Io(String),

    /// 설정 오류 (저장소 접근 불가 등)
    #[error("Configuration error: {0}")]
    Config(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// 입력 누락 여부 (빈 데이터로 취급)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<CoreError> for StorageError {
    fn from(err: CoreError) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
