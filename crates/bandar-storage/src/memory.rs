//! 메모리 기반 블롭 저장소 (테스트 및 dry-run용).

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::blob::{matches_prefix, normalize_path, normalize_prefix, BlobStore};
use crate::error::{Result, StorageError};

/// `BTreeMap` 기반 블롭 저장소.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<BTreeMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 초기 블롭 목록으로 생성
    pub fn with_blobs<I, P, C>(blobs: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: Into<String>,
    {
        let map = blobs
            .into_iter()
            .filter_map(|(p, c)| normalize_path(p.as_ref()).ok().map(|p| (p, c.into())))
            .collect();
        Self {
            blobs: RwLock::new(map),
        }
    }

    /// 저장된 블롭 수
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// 비어 있는지 여부
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn list_paths(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = normalize_prefix(prefix)?;
        let blobs = self.blobs.read().await;
        Ok(blobs
            .range(prefix.clone()..)
            .take_while(|(path, _)| matches_prefix(path, &prefix))
            .map(|(path, _)| path.clone())
            .collect())
    }

    async fn download_text(&self, path: &str) -> Result<String> {
        let key = normalize_path(path)?;
        self.blobs
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn upload_text(&self, path: &str, content: &str, _content_type: &str) -> Result<()> {
        let key = normalize_path(path)?;
        if key.is_empty() {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        self.blobs.write().await.insert(key, content.to_string());
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let key = normalize_path(path)?;
        Ok(self.blobs.read().await.contains_key(&key))
    }
}
