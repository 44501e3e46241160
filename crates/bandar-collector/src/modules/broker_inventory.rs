//! 브로커 인벤토리 집계 모듈.
//!
//! 모든 브로커 거래 날짜를 읽어 (브로커, 종목)별 누적 거래량 파일을 다시 씁니다.
//!
//! # 진행률
//!
//! - 0~50%: 날짜 배치 로드
//! - 50~100%: 인벤토리 파일 기록

use std::time::Instant;

use bandar_analytics::InventoryAccumulator;
use bandar_core::BrokerInventoryRecord;
use bandar_storage::{discovery, paths, BlobStore};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use super::broker_batch::{load_batch, BrokerFilter};
use super::{scaled_progress, should_report, write_csv};
use crate::{CollectorConfig, JobStats, ProgressReporter, Result};

/// 브로커 인벤토리 재계산
pub async fn aggregate_broker_inventory(
    store: &dyn BlobStore,
    config: &CollectorConfig,
    progress: &ProgressReporter,
    filter: &BrokerFilter,
) -> Result<JobStats> {
    let start = Instant::now();
    let mut stats = JobStats::new();

    info!("브로커 인벤토리 집계 시작");

    let dates = discovery::discover_broker_dates(store).await?;
    if dates.is_empty() {
        warn!("브로커 거래 날짜가 없습니다");
        progress.report(100.0, "처리할 날짜 없음").await;
        stats.elapsed = start.elapsed();
        return Ok(stats);
    }

    let batch_size = config.aggregator.effective_batch_size();
    let concurrency = config.aggregator.effective_concurrency();
    let threshold = config.aggregator.gc_threshold_bytes();

    info!(
        dates = dates.len(),
        first = %dates[0],
        last = %dates[dates.len() - 1],
        batch_size,
        "날짜 탐색 완료"
    );

    let mut accumulator = InventoryAccumulator::new();
    let mut loaded_dates = 0;

    for batch in dates.chunks(batch_size) {
        for day in load_batch(store, batch, filter, concurrency).await {
            stats.errors += day.failed;
            if day.transactions.is_empty() {
                stats.empty += 1;
            }
            for (broker, transactions) in &day.transactions {
                accumulator.add_transactions(day.date, broker, transactions);
            }
        }
        loaded_dates += batch.len();

        let estimated = accumulator.estimated_bytes() as u64;
        if estimated > threshold {
            warn!(
                estimated_mb = estimated / (1024 * 1024),
                threshold_mb = config.aggregator.gc_threshold_mb,
                "메모리 임계치 초과, 여유 용량 반환"
            );
            accumulator.shrink_to_fit();
        }

        progress
            .report(
                scaled_progress(0.0, 50.0, loaded_dates, dates.len()),
                format!("날짜 로드 {}/{}", loaded_dates, dates.len()),
            )
            .await;
    }

    info!(pairs = accumulator.pair_count(), "누적 계산 시작");
    let series = accumulator.into_series(&dates);
    let total_files = series.len();
    stats.total = total_files;

    let mut writes = stream::iter(series.into_iter().map(|(key, rows)| async move {
        let path = paths::broker_inventory_path(&key.emiten, &key.broker);
        let result = write_csv(store, &path, &BrokerInventoryRecord::CSV_HEADER, &rows).await;
        (path, result)
    }))
    .buffer_unordered(concurrency);

    let mut done = 0;
    while let Some((path, result)) = writes.next().await {
        done += 1;
        match result {
            Ok(()) => {
                stats.success += 1;
                stats.files_written += 1;
            }
            Err(e) => {
                warn!(path = %path, error = %e, "인벤토리 파일 기록 실패");
                stats.errors += 1;
            }
        }

        if should_report(done, total_files) {
            progress
                .report(
                    scaled_progress(50.0, 100.0, done, total_files),
                    format!("파일 기록 {}/{}", done, total_files),
                )
                .await;
        }
    }
    if total_files == 0 {
        progress.report(100.0, "기록할 파일 없음").await;
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}
