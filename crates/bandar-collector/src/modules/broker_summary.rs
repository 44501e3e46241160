//! 브로커 유형별 일간 요약 모듈.
//!
//! 날짜별로 모든 브로커 파일을 읽어 `broker_summary_type/broker_summary_<date>.csv`를 씁니다.
//! 브로커 유형은 `csv_input/broker_list.csv`에서 읽고, 없으면 모두 국내로 봅니다.

use std::time::Instant;

use bandar_analytics::summarize_by_type;
use bandar_core::BrokerTypeSummary;
use bandar_storage::{discovery, loader, paths, BlobStore};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use super::broker_batch::{load_batch, BrokerFilter};
use super::{scaled_progress, write_csv};
use crate::{CollectorConfig, JobStats, ProgressReporter, Result};

/// 브로커 유형별 요약 재계산
pub async fn aggregate_broker_summary(
    store: &dyn BlobStore,
    config: &CollectorConfig,
    progress: &ProgressReporter,
) -> Result<JobStats> {
    let start = Instant::now();
    let mut stats = JobStats::new();

    info!("브로커 유형별 요약 시작");

    let broker_types = loader::load_broker_types(store).await?;
    if broker_types.is_empty() {
        warn!("브로커 유형 목록이 없어 모든 브로커를 Domestic으로 집계합니다");
    }

    let dates = discovery::discover_broker_dates(store).await?;
    stats.total = dates.len();
    if dates.is_empty() {
        progress.report(100.0, "처리할 날짜 없음").await;
        stats.elapsed = start.elapsed();
        return Ok(stats);
    }

    let concurrency = config.aggregator.effective_concurrency();
    let filter = BrokerFilter::all();
    let mut processed = 0;

    for batch in dates.chunks(config.aggregator.effective_batch_size()) {
        let days = load_batch(store, batch, &filter, concurrency).await;

        let mut summaries = Vec::with_capacity(days.len());
        for day in days {
            stats.errors += day.failed;
            if day.transactions.is_empty() {
                stats.empty += 1;
                continue;
            }
            let rows = summarize_by_type(&day.transactions, &broker_types);
            summaries.push((paths::broker_summary_path(&day.date), rows));
        }

        let results: Vec<(String, Result<()>)> = stream::iter(summaries.iter().map(
            |(path, rows)| async move {
                let result = write_csv(store, path, &BrokerTypeSummary::CSV_HEADER, rows).await;
                (path.clone(), result)
            },
        ))
        .buffer_unordered(concurrency)
        .collect()
        .await;

        for (path, result) in results {
            match result {
                Ok(()) => {
                    stats.success += 1;
                    stats.files_written += 1;
                }
                Err(e) => {
                    warn!(path = %path, error = %e, "요약 파일 기록 실패");
                    stats.errors += 1;
                }
            }
        }

        processed += batch.len();
        progress
            .report(
                scaled_progress(0.0, 100.0, processed, dates.len()),
                format!("날짜 처리 {}/{}", processed, dates.len()),
            )
            .await;
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}
