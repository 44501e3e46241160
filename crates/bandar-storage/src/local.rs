//! 파일시스템 기반 블롭 저장소.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::blob::{matches_prefix, normalize_path, normalize_prefix, BlobStore};
use crate::error::{Result, StorageError};

/// 루트 디렉터리 아래 파일을 블롭으로 다루는 저장소.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// 저장소 생성. 루트 디렉터리가 없으면 설정 오류입니다.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StorageError::Config(format!(
                "저장소 루트 디렉터리가 없습니다: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// 루트 디렉터리
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let normalized = normalize_path(path)?;
        if normalized.is_empty() {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(normalized))
    }

    /// 파일시스템 경로를 블롭 경로로 변환
    fn to_blob_path(&self, file: &Path) -> Option<String> {
        let relative = file.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn list_paths(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = normalize_prefix(prefix)?;
        // 접두사의 마지막 `/` 앞까지를 탐색 시작 디렉터리로 사용
        let start_dir = match prefix.rfind('/') {
            Some(idx) => self.root.join(&prefix[..idx]),
            None => self.root.clone(),
        };

        let mut paths = Vec::new();
        let mut pending = vec![start_dir];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                } else if let Some(blob_path) = self.to_blob_path(&path) {
                    if matches_prefix(&blob_path, &prefix) {
                        paths.push(blob_path);
                    }
                }
            }
        }

        paths.sort();
        debug!(prefix = %prefix, count = paths.len(), "블롭 목록 조회");
        Ok(paths)
    }

    async fn download_text(&self, path: &str) -> Result<String> {
        let file = self.resolve(path)?;
        match tokio::fs::read_to_string(&file).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn upload_text(&self, path: &str, content: &str, content_type: &str) -> Result<()> {
        let file = self.resolve(path)?;
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&file, content).await?;
        debug!(path = %path, content_type = content_type, bytes = content.len(), "블롭 저장");
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let file = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&file).await? && file.is_file())
    }
}
