//! 블롭 경로 기반 입력 탐색.
//!
//! 날짜, 브로커, 종목, 지수 목록은 별도 메타데이터 없이 경로 이름 규칙에서 얻습니다.

use std::collections::BTreeSet;

use bandar_core::DateKey;
use tracing::debug;

use crate::blob::BlobStore;
use crate::error::Result;
use crate::paths::{self, file_stem};

/// 종목 CSV 위치.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLocation {
    /// 섹터 폴더명
    pub sector: String,
    /// 종목 코드
    pub ticker: String,
    /// 블롭 경로
    pub path: String,
}

/// `broker_transaction_<6|8자리>` 세그먼트에서 날짜 키 추출.
pub fn parse_broker_date_segment(segment: &str) -> Option<DateKey> {
    segment
        .strip_prefix(paths::BROKER_TRANSACTION_DIR_PREFIX)
        .and_then(DateKey::parse)
}

/// 브로커 거래 데이터가 있는 모든 날짜 (오름차순, 중복 제거).
pub async fn discover_broker_dates(store: &dyn BlobStore) -> Result<Vec<DateKey>> {
    let listed = store.list_paths(paths::BROKER_TRANSACTION_PREFIX).await?;

    let dates: BTreeSet<DateKey> = listed
        .iter()
        .filter_map(|path| path.split('/').find_map(parse_broker_date_segment))
        .collect();

    debug!(count = dates.len(), "브로커 거래 날짜 탐색 완료");
    Ok(dates.into_iter().collect())
}

/// 해당 날짜에 파일이 있는 브로커 코드 목록 (정렬됨).
pub async fn list_brokers_for_date(store: &dyn BlobStore, date: &DateKey) -> Result<Vec<String>> {
    let dir = paths::broker_transaction_dir(date);
    let listed = store.list_paths(&dir).await?;

    let brokers: BTreeSet<String> = listed
        .iter()
        .filter_map(|path| path.strip_prefix(&dir))
        .filter(|rest| !rest.contains('/'))
        .filter_map(file_stem)
        .map(str::to_string)
        .collect();

    Ok(brokers.into_iter().collect())
}

/// `stock/<sector>/<ticker>.csv` 형식의 모든 종목 (종목 코드순).
pub async fn discover_stocks(store: &dyn BlobStore) -> Result<Vec<StockLocation>> {
    let listed = store.list_paths(paths::STOCK_PREFIX).await?;

    let mut stocks: Vec<StockLocation> = listed
        .into_iter()
        .filter_map(|path| {
            let rest = path.strip_prefix(paths::STOCK_PREFIX)?;
            let (sector, file) = rest.split_once('/')?;
            if sector.is_empty() || file.contains('/') {
                return None;
            }
            let ticker = file_stem(file)?.to_string();
            Some(StockLocation {
                sector: sector.to_string(),
                ticker,
                path: path.clone(),
            })
        })
        .collect();

    stocks.sort_by(|a, b| a.ticker.cmp(&b.ticker).then_with(|| a.sector.cmp(&b.sector)));
    debug!(count = stocks.len(), "종목 탐색 완료");
    Ok(stocks)
}

/// `<index_dir>/<name>.csv` 형식의 지수 이름 목록 (정렬됨).
///
/// `index_dir`가 비어 있으면 저장소 루트의 CSV를 지수로 봅니다.
pub async fn list_indexes(store: &dyn BlobStore, index_dir: &str) -> Result<Vec<String>> {
    let dir = match index_dir.trim_matches('/') {
        "" => String::new(),
        trimmed => format!("{}/", trimmed),
    };
    let listed = store.list_paths(&dir).await?;

    Ok(listed
        .iter()
        .filter_map(|path| path.strip_prefix(&dir))
        .filter(|rest| !rest.contains('/'))
        .filter_map(file_stem)
        .map(str::to_string)
        .collect())
}

/// RRG 결과 파일이 있는 종목 목록 (정렬됨).
pub async fn list_rrg_symbols(store: &dyn BlobStore) -> Result<Vec<String>> {
    let listed = store.list_paths(paths::RRG_STOCK_PREFIX).await?;

    Ok(listed
        .iter()
        .filter_map(|path| path.strip_prefix(paths::RRG_STOCK_PREFIX))
        .filter(|rest| !rest.contains('/'))
        .filter_map(file_stem)
        .filter_map(|stem| stem.strip_prefix(paths::RRG_STOCK_FILE_PREFIX))
        .filter(|symbol| !symbol.is_empty())
        .map(str::to_string)
        .collect())
}
