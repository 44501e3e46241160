//! 기간별 추세 필터 모듈.
//!
//! 모든 종목 CSV를 읽어 3D/5D/2W/1M 기간별 추세 파일과 요약 파일을 씁니다.

use std::collections::HashMap;
use std::time::Instant;

use bandar_analytics::{sort_by_change_desc, TrendCalculator};
use bandar_core::{TrendPeriod, TrendRecord, TrendSummary};
use bandar_storage::{discovery, loader, paths, BlobStore, StockLocation};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::{scaled_progress, should_report, write_csv};
use crate::{CollectorConfig, JobStats, ProgressReporter, Result};

/// 종목 하나의 기간별 추세 레코드 계산.
async fn evaluate_stock(
    store: &dyn BlobStore,
    calculator: TrendCalculator,
    location: &StockLocation,
    name: &str,
) -> Result<Vec<TrendRecord>> {
    let bars = loader::load_stock_bars(store, &location.path).await?;

    let mut records = Vec::with_capacity(TrendPeriod::ALL.len());
    for period in TrendPeriod::ALL {
        match calculator.evaluate(&bars, period) {
            Ok(signal) => records.push(TrendRecord {
                symbol: location.ticker.clone(),
                name: name.to_string(),
                price: signal.latest_price,
                change_pct: signal.change_pct,
                sector: location.sector.clone(),
                trend: signal.trend,
                period,
            }),
            Err(e) if e.is_insufficient_data() => {
                debug!(ticker = %location.ticker, period = %period, "봉 부족, 건너뜀");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(records)
}

/// 추세 필터 재계산
pub async fn aggregate_trends(
    store: &dyn BlobStore,
    config: &CollectorConfig,
    progress: &ProgressReporter,
) -> Result<JobStats> {
    let start = Instant::now();
    let mut stats = JobStats::new();

    info!("추세 필터 시작");

    let stocks = discovery::discover_stocks(store).await?;
    let names = loader::load_name_directory(store).await?;
    stats.total = stocks.len();

    let calculator = TrendCalculator::new();
    let names = &names;
    let mut evaluations = stream::iter(stocks.iter().map(|location| async move {
        let name = names
            .get(&location.ticker.to_uppercase())
            .map(String::as_str)
            .unwrap_or(location.ticker.as_str());
        let result = evaluate_stock(store, calculator, location, name).await;
        (location, result)
    }))
    .buffer_unordered(config.aggregator.effective_concurrency());

    let mut by_period: HashMap<TrendPeriod, Vec<TrendRecord>> = HashMap::new();
    let mut done = 0;
    while let Some((location, result)) = evaluations.next().await {
        done += 1;
        match result {
            Ok(records) if records.is_empty() => stats.skipped += 1,
            Ok(records) => {
                stats.success += 1;
                for record in records {
                    by_period.entry(record.period).or_default().push(record);
                }
            }
            Err(e) => {
                warn!(ticker = %location.ticker, error = %e, "종목 추세 계산 실패");
                stats.errors += 1;
            }
        }

        if should_report(done, stocks.len()) {
            progress
                .report(
                    scaled_progress(0.0, 80.0, done, stocks.len()),
                    format!("종목 분석 {}/{}", done, stocks.len()),
                )
                .await;
        }
    }

    let mut summaries = Vec::with_capacity(TrendPeriod::ALL.len());
    for (i, period) in TrendPeriod::ALL.into_iter().enumerate() {
        let mut records = by_period.remove(&period).unwrap_or_default();
        sort_by_change_desc(&mut records);
        summaries.push(calculator.summarize(period, &records));

        write_csv(
            store,
            &paths::trend_output_path(period),
            &TrendRecord::CSV_HEADER,
            &records,
        )
        .await?;
        stats.files_written += 1;
        info!(period = %period, count = records.len(), "기간별 추세 기록 완료");

        progress
            .report(
                scaled_progress(80.0, 100.0, i + 1, TrendPeriod::ALL.len() + 1),
                format!("{} 기록", period),
            )
            .await;
    }

    write_csv(
        store,
        &paths::trend_summary_path(),
        &TrendSummary::CSV_HEADER,
        &summaries,
    )
    .await?;
    stats.files_written += 1;
    progress.report(100.0, "요약 기록").await;

    stats.elapsed = start.elapsed();
    Ok(stats)
}
