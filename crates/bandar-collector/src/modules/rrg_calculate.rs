//! 종목별 RRG 계산 모듈.
//!
//! 벤치마크 지수 대비 RS-Ratio / RS-Momentum 시계열을
//! `rrg_output/stock/o1-rrg-<symbol>.csv`로 씁니다.

use std::time::Instant;

use bandar_analytics::RrgCalculator;
use bandar_core::{RrgPoint, StockBar};
use bandar_storage::{discovery, loader, paths, BlobStore, StockLocation};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::{scaled_progress, should_report, write_csv};
use crate::error::CollectorError;
use crate::{CollectorConfig, JobStats, ProgressReporter, Result};

enum Outcome {
    Written,
    Skipped,
}

async fn calculate_stock(
    store: &dyn BlobStore,
    calculator: RrgCalculator,
    location: &StockLocation,
    benchmark: &[StockBar],
) -> Result<Outcome> {
    let bars = loader::load_stock_bars(store, &location.path).await?;
    match calculator.calculate(&bars, benchmark) {
        Ok(points) => {
            let path = paths::rrg_stock_path(&location.ticker);
            write_csv(store, &path, &RrgPoint::CSV_HEADER, &points).await?;
            Ok(Outcome::Written)
        }
        Err(e) if e.is_insufficient_data() => {
            debug!(ticker = %location.ticker, reason = %e, "RRG 이력 부족, 건너뜀");
            Ok(Outcome::Skipped)
        }
        Err(e) => Err(e.into()),
    }
}

/// 종목별 RRG 재계산
pub async fn calculate_rrg(
    store: &dyn BlobStore,
    config: &CollectorConfig,
    progress: &ProgressReporter,
) -> Result<JobStats> {
    let start = Instant::now();
    let mut stats = JobStats::new();

    let calculator = RrgCalculator::new(config.analysis.rrg_window)?;
    let benchmark_path = paths::index_path(
        &config.aggregator.index_dir,
        &config.analysis.rrg_benchmark,
    );
    let benchmark = loader::load_stock_bars(store, &benchmark_path).await?;
    if benchmark.is_empty() {
        return Err(CollectorError::Config(format!(
            "벤치마크 지수 데이터가 없습니다: {}",
            benchmark_path
        )));
    }

    info!(
        benchmark = %config.analysis.rrg_benchmark,
        window = calculator.window(),
        bars = benchmark.len(),
        "RRG 계산 시작"
    );

    let stocks = discovery::discover_stocks(store).await?;
    stats.total = stocks.len();

    let benchmark = benchmark.as_slice();
    let mut calculations = stream::iter(stocks.iter().map(|location| async move {
        let result = calculate_stock(store, calculator, location, benchmark).await;
        (location, result)
    }))
    .buffer_unordered(config.aggregator.effective_concurrency());

    let mut done = 0;
    while let Some((location, result)) = calculations.next().await {
        done += 1;
        match result {
            Ok(Outcome::Written) => {
                stats.success += 1;
                stats.files_written += 1;
            }
            Ok(Outcome::Skipped) => stats.skipped += 1,
            Err(e) => {
                warn!(ticker = %location.ticker, error = %e, "종목 RRG 계산 실패");
                stats.errors += 1;
            }
        }

        if should_report(done, stocks.len()) {
            progress
                .report(
                    scaled_progress(0.0, 100.0, done, stocks.len()),
                    format!("종목 RRG {}/{}", done, stocks.len()),
                )
                .await;
        }
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}
