//! 종목 → 섹터 해석 및 실행 단위 캐시.
//!
//! 섹터는 고정된 섹터 폴더 목록에서 `stock/<sector>/<ticker>.csv`를 차례로 찾아 결정합니다.
//! 캐시는 한 번의 작업 실행 동안만 유지되며, 실행마다 새로 만듭니다.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::blob::BlobStore;
use crate::error::Result;
use crate::paths;

/// 종목별 섹터 캐시 (탐색 실패도 `None`으로 기록).
#[derive(Debug, Default)]
pub struct SectorCache {
    entries: Mutex<HashMap<String, Option<String>>>,
}

impl SectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 캐시 조회. 기록이 없으면 `None`, 탐색 실패 기록은 `Some(None)`.
    pub fn get(&self, ticker: &str) -> Option<Option<String>> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(ticker).cloned())
    }

    /// 캐시 기록
    pub fn set(&self, ticker: &str, sector: Option<String>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(ticker.to_string(), sector);
        }
    }

    /// 기록된 종목 수
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 섹터 폴더 탐색기.
pub struct SectorResolver<'a> {
    store: &'a dyn BlobStore,
    sectors: &'a [String],
    cache: &'a SectorCache,
}

impl<'a> SectorResolver<'a> {
    pub fn new(store: &'a dyn BlobStore, sectors: &'a [String], cache: &'a SectorCache) -> Self {
        Self {
            store,
            sectors,
            cache,
        }
    }

    /// 종목의 섹터 폴더명. 어느 폴더에도 없으면 `None`.
    pub async fn resolve(&self, ticker: &str) -> Result<Option<String>> {
        if let Some(cached) = self.cache.get(ticker) {
            return Ok(cached);
        }

        let mut found = None;
        for sector in self.sectors {
            if self.store.exists(&paths::stock_path(sector, ticker)).await? {
                found = Some(sector.clone());
                break;
            }
        }

        debug!(ticker = %ticker, sector = ?found, "섹터 탐색");
        self.cache.set(ticker, found.clone());
        Ok(found)
    }
}
