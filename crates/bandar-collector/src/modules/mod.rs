//! 집계 작업 모듈.

use bandar_core::codec;
use bandar_storage::{loader, BlobStore};
use serde::Serialize;

use crate::Result;

pub mod broker_batch;
pub mod broker_inventory;
pub mod broker_summary;
pub mod rrg_calculate;
pub mod rrg_scanner;
pub mod seasonality;
pub mod trend_filter;

pub use broker_inventory::aggregate_broker_inventory;
pub use broker_summary::aggregate_broker_summary;
pub use rrg_calculate::calculate_rrg;
pub use rrg_scanner::scan_rrg;
pub use seasonality::aggregate_seasonality;
pub use trend_filter::aggregate_trends;

/// 스케줄러 로그 기능명
pub mod feature {
    pub const BROKER_INVENTORY: &str = "broker-inventory";
    pub const BROKER_SUMMARY: &str = "broker-summary";
    pub const TREND_FILTER: &str = "trend-filter";
    pub const SEASONALITY: &str = "seasonality";
    pub const RRG_CALCULATE: &str = "rrg-calculate";
    pub const RRG_SCAN: &str = "rrg-scan";
}

/// 출력 파일 진행률 보고 간격
pub(crate) const PROGRESS_STEP: usize = 50;

/// 헤더와 레코드를 CSV로 직렬화하여 업로드.
pub(crate) async fn write_csv<T: Serialize>(
    store: &dyn BlobStore,
    path: &str,
    header: &[&str],
    records: &[T],
) -> Result<()> {
    let content = codec::write_records(header, records)?;
    loader::upload_csv(store, path, &content).await?;
    tracing::debug!(path = %path, rows = records.len(), "CSV 기록 완료");
    Ok(())
}

/// `done`개 처리 시점의 진행률 (`start`..`end` 구간으로 환산).
pub(crate) fn scaled_progress(start: f64, end: f64, done: usize, total: usize) -> f64 {
    if total == 0 {
        return end;
    }
    start + (end - start) * done as f64 / total as f64
}

/// 진행률을 보고할 시점인지 여부
pub(crate) fn should_report(done: usize, total: usize) -> bool {
    done == total || done % PROGRESS_STEP == 0
}
