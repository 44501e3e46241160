//! 블롭 저장소 트레이트.

use async_trait::async_trait;

use crate::error::{Result, StorageError};

/// CSV 업로드 콘텐츠 타입
pub const CONTENT_TYPE_CSV: &str = "text/csv";

/// 경로 기반 텍스트 블롭 저장소.
///
/// 경로는 `/` 구분자를 쓰고 앞에 `/`를 붙이지 않습니다 (예: `stock/Financials/BBCA.csv`).
/// 여러 파일에 걸친 원자적 쓰기는 보장하지 않습니다.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// 접두사 아래의 모든 블롭 경로 (재귀, 정렬됨).
    async fn list_paths(&self, prefix: &str) -> Result<Vec<String>>;

    /// 텍스트 블롭 읽기. 없으면 `StorageError::NotFound`.
    async fn download_text(&self, path: &str) -> Result<String>;

    /// 텍스트 블롭 쓰기 (덮어쓰기).
    async fn upload_text(&self, path: &str, content: &str, content_type: &str) -> Result<()>;

    /// 블롭 존재 여부.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// 텍스트 블롭 읽기. 없으면 `None`.
    async fn download_optional(&self, path: &str) -> Result<Option<String>> {
        match self.download_text(path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// 블롭 경로 정규화 및 검증.
///
/// 역슬래시를 `/`로 바꾸고 앞뒤 `/`를 제거합니다. `..` 세그먼트는 거부합니다.
pub fn normalize_path(path: &str) -> Result<String> {
    let normalized = path.replace('\\', "/");
    let trimmed = normalized.trim_matches('/');

    if trimmed.split('/').any(|seg| seg == "..") {
        return Err(StorageError::InvalidPath(path.to_string()));
    }

    Ok(trimmed.to_string())
}

/// 목록 조회용 접두사 정규화. 끝의 `/`는 디렉터리 경계로 유지합니다.
pub(crate) fn normalize_prefix(prefix: &str) -> Result<String> {
    let normalized = normalize_path(prefix)?;
    if prefix.ends_with('/') && !normalized.is_empty() {
        Ok(format!("{}/", normalized))
    } else {
        Ok(normalized)
    }
}

/// 접두사 일치 여부 (세그먼트 단위가 아닌 문자열 접두사).
pub(crate) fn matches_prefix(path: &str, prefix: &str) -> bool {
    prefix.is_empty() || path.starts_with(prefix)
}
