//! 지수 계절성 모듈.
//!
//! `index_dir` 아래의 모든 지수 CSV를 읽어 한 개의 결과 파일로 씁니다.

use std::time::Instant;

use bandar_analytics::SeasonalityCalculator;
use bandar_core::SeasonalityRecord;
use bandar_storage::{discovery, loader, paths, BlobStore};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::{scaled_progress, should_report, write_csv};
use crate::{CollectorConfig, JobStats, ProgressReporter, Result};

/// 지수 계절성 재계산
pub async fn aggregate_seasonality(
    store: &dyn BlobStore,
    config: &CollectorConfig,
    progress: &ProgressReporter,
) -> Result<JobStats> {
    let start = Instant::now();
    let mut stats = JobStats::new();
    let index_dir = config.aggregator.index_dir.as_str();

    info!(index_dir = %index_dir, "계절성 계산 시작");

    let indexes = discovery::list_indexes(store, index_dir).await?;
    stats.total = indexes.len();

    let calculator = SeasonalityCalculator::new();
    let mut calculations = stream::iter(indexes.iter().map(|name| async move {
        let result = loader::load_stock_bars(store, &paths::index_path(index_dir, name))
            .await
            .map(|bars| calculator.calculate(name, name, &bars));
        (name, result)
    }))
    .buffer_unordered(config.aggregator.effective_concurrency());

    let mut records: Vec<SeasonalityRecord> = Vec::with_capacity(indexes.len());
    let mut done = 0;
    while let Some((name, result)) = calculations.next().await {
        done += 1;
        match result {
            Ok(Ok(record)) => {
                stats.success += 1;
                records.push(record);
            }
            Ok(Err(e)) => {
                debug!(index = %name, reason = %e, "데이터 부족, 건너뜀");
                stats.skipped += 1;
            }
            Err(e) => {
                warn!(index = %name, error = %e, "지수 로드 실패");
                stats.errors += 1;
            }
        }

        if should_report(done, indexes.len()) {
            progress
                .report(
                    scaled_progress(0.0, 90.0, done, indexes.len()),
                    format!("지수 분석 {}/{}", done, indexes.len()),
                )
                .await;
        }
    }

    records.sort_by(|a, b| a.ticker.cmp(&b.ticker));
    let output = paths::seasonal_output_path(&config.aggregator.output_dir);
    write_csv(store, &output, &SeasonalityRecord::csv_header(), &records).await?;
    stats.files_written += 1;

    info!(path = %output, indexes = records.len(), "계절성 결과 기록 완료");
    progress.report(100.0, "결과 기록").await;

    stats.elapsed = start.elapsed();
    Ok(stats)
}
