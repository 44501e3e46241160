//! RRG 스캐너 모듈.
//!
//! 종목별 최신 RRG 포인트와 최근 주가로 사분면을 분류해 `rrg_output/o3-rrg.csv`에 씁니다.
//! 섹터 탐색 결과는 이 실행 동안만 캐시합니다.

use std::time::Instant;

use bandar_analytics::{sort_by_rs_ratio_desc, RrgScanner};
use bandar_core::RrgScannerRecord;
use bandar_storage::{discovery, loader, paths, BlobStore, SectorCache, SectorResolver};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::{scaled_progress, should_report, write_csv};
use crate::{CollectorConfig, JobStats, ProgressReporter, Result};

async fn scan_symbol(
    store: &dyn BlobStore,
    resolver: &SectorResolver<'_>,
    scanner: RrgScanner,
    symbol: &str,
) -> Result<Option<RrgScannerRecord>> {
    let Some(point) = loader::load_latest_rrg_point(store, symbol).await? else {
        return Ok(None);
    };

    let sector = match resolver.resolve(symbol).await {
        Ok(sector) => sector,
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "섹터 탐색 실패");
            None
        }
    };

    let bars = match &sector {
        Some(sector) => loader::load_stock_bars(store, &paths::stock_path(sector, symbol)).await?,
        None => Vec::new(),
    };

    Ok(Some(scanner.scan(symbol, sector.as_deref(), &point, &bars)))
}

/// RRG 스캐너 실행
pub async fn scan_rrg(
    store: &dyn BlobStore,
    config: &CollectorConfig,
    progress: &ProgressReporter,
) -> Result<JobStats> {
    let start = Instant::now();
    let mut stats = JobStats::new();

    let symbols = discovery::list_rrg_symbols(store).await?;
    stats.total = symbols.len();
    info!(symbols = symbols.len(), "RRG 스캐너 시작");

    let cache = SectorCache::new();
    let resolver = SectorResolver::new(store, &config.analysis.sectors, &cache);
    let resolver = &resolver;
    let scanner = RrgScanner::new();

    let mut scans = stream::iter(symbols.iter().map(|symbol| async move {
        let result = scan_symbol(store, resolver, scanner, symbol).await;
        (symbol, result)
    }))
    .buffer_unordered(config.aggregator.effective_concurrency());

    let mut records = Vec::with_capacity(symbols.len());
    let mut done = 0;
    while let Some((symbol, result)) = scans.next().await {
        done += 1;
        match result {
            Ok(Some(record)) => {
                stats.success += 1;
                records.push(record);
            }
            Ok(None) => {
                debug!(symbol = %symbol, "RRG 포인트 없음, 건너뜀");
                stats.skipped += 1;
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "종목 스캔 실패");
                stats.errors += 1;
            }
        }

        if should_report(done, symbols.len()) {
            progress
                .report(
                    scaled_progress(0.0, 90.0, done, symbols.len()),
                    format!("종목 스캔 {}/{}", done, symbols.len()),
                )
                .await;
        }
    }

    sort_by_rs_ratio_desc(&mut records);
    write_csv(store, paths::RRG_SCANNER_PATH, &RrgScannerRecord::CSV_HEADER, &records).await?;
    stats.files_written += 1;

    info!(records = records.len(), cached_sectors = cache.len(), "RRG 스캐너 결과 기록 완료");
    progress.report(100.0, "결과 기록").await;

    stats.elapsed = start.elapsed();
    Ok(stats)
}
