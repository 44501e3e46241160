//! 타입이 있는 CSV 로더.
//!
//! 입력 블롭이 없으면 오류 대신 빈 데이터를 반환합니다.
//! 저장소 자체 오류(권한, 연결 등)는 그대로 전파합니다.

use std::collections::HashMap;

use bandar_core::{
    codec, BrokerTransaction, BrokerType, DateKey, RrgPoint, StockBar, BROKER_TRANSACTION_FIELDS,
};
use tracing::debug;

use crate::blob::{BlobStore, CONTENT_TYPE_CSV};
use crate::error::Result;
use crate::paths;

/// 블롭 텍스트 읽기 (없으면 `None`, 디버그 로그).
async fn read_if_present(store: &dyn BlobStore, path: &str) -> Result<Option<String>> {
    let text = store.download_optional(path).await?;
    if text.is_none() {
        debug!(path = %path, "입력 블롭 없음, 빈 데이터로 처리");
    }
    Ok(text)
}

/// 주가 CSV 로드 (날짜 오름차순).
pub async fn load_stock_bars(store: &dyn BlobStore, path: &str) -> Result<Vec<StockBar>> {
    Ok(match read_if_present(store, path).await? {
        Some(text) => StockBar::series_from_rows(&codec::parse(&text)),
        None => Vec::new(),
    })
}

/// 특정 날짜/브로커의 거래 레코드 로드.
pub async fn load_broker_transactions(
    store: &dyn BlobStore,
    date: &DateKey,
    broker: &str,
) -> Result<Vec<BrokerTransaction>> {
    let path = paths::broker_transaction_path(date, broker);
    Ok(match read_if_present(store, &path).await? {
        Some(text) => codec::parse_positional(&text, BROKER_TRANSACTION_FIELDS)
            .iter()
            .filter_map(|fields| BrokerTransaction::from_fields(fields))
            .collect(),
        None => Vec::new(),
    })
}

/// 종목의 최신 RRG 포인트 로드.
pub async fn load_latest_rrg_point(store: &dyn BlobStore, symbol: &str) -> Result<Option<RrgPoint>> {
    let path = paths::rrg_stock_path(symbol);
    Ok(read_if_present(store, &path)
        .await?
        .and_then(|text| RrgPoint::latest(&codec::parse(&text))))
}

/// 브로커 코드 → 유형 매핑 (`csv_input/broker_list.csv`, 없으면 빈 매핑).
pub async fn load_broker_types(store: &dyn BlobStore) -> Result<HashMap<String, BrokerType>> {
    let Some(text) = read_if_present(store, paths::BROKER_LIST_PATH).await? else {
        return Ok(HashMap::new());
    };

    Ok(codec::parse(&text)
        .iter()
        .filter_map(|row| {
            let code = row.get_any(&["Code", "BrokerCode", "Broker"])?;
            let label = row.get_any(&["Type", "BrokerType", "Category"]).unwrap_or("");
            (!code.is_empty()).then(|| (code.to_uppercase(), BrokerType::from_label(label)))
        })
        .collect())
}

/// 종목 코드 → 종목명 매핑 (`csv_input/emiten_list.csv`, 없으면 빈 매핑).
pub async fn load_name_directory(store: &dyn BlobStore) -> Result<HashMap<String, String>> {
    let Some(text) = read_if_present(store, paths::EMITEN_LIST_PATH).await? else {
        return Ok(HashMap::new());
    };

    Ok(codec::parse(&text)
        .iter()
        .filter_map(|row| {
            let code = row.get_any(&["Code", "Symbol", "Ticker"])?;
            let name = row.get_any(&["Name", "CompanyName"])?;
            (!code.is_empty() && !name.is_empty())
                .then(|| (code.to_uppercase(), name.to_string()))
        })
        .collect())
}

/// CSV 텍스트 업로드.
pub async fn upload_csv(store: &dyn BlobStore, path: &str, content: &str) -> Result<()> {
    store.upload_text(path, content, CONTENT_TYPE_CSV).await
}
