//! 지수 계절성 명령어.
//!
//! # 사용 예시
//!
//! ```bash
//! # 지수 목록 보기
//! seasonality --index-dir ./index --list-indexes
//!
//! # 계절성 계산
//! seasonality --index-dir ./index --output-dir ./seasonal_output
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bandar_analytics::SeasonalityCalculator;
use bandar_core::{codec, SeasonalityRecord};
use bandar_storage::{discovery, loader, paths, LocalBlobStore};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

/// 결과 파일명
pub const OUTPUT_FILE_NAME: &str = paths::SEASONAL_FILE_NAME;

/// 계절성 실행 설정.
#[derive(Debug, Clone)]
pub struct SeasonalityConfig {
    pub index_dir: PathBuf,
    pub output_dir: PathBuf,
    /// 진행률 표시 여부
    pub show_progress: bool,
}

fn open_store(dir: &Path) -> Result<LocalBlobStore> {
    LocalBlobStore::new(dir).with_context(|| format!("디렉터리를 열 수 없습니다: {}", dir.display()))
}

/// 디렉터리의 지수 이름 목록 (`*.csv` 파일명, 정렬됨).
pub async fn list_indexes(index_dir: &Path) -> Result<Vec<String>> {
    let store = open_store(index_dir)?;
    Ok(discovery::list_indexes(&store, "").await?)
}

fn progress_bar(len: usize, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// 모든 지수의 계절성을 계산하여 결과 파일 경로를 반환합니다.
///
/// 읽지 못한 지수와 봉이 2개 미만인 지수는 경고 후 건너뜁니다.
pub async fn run_seasonality(config: &SeasonalityConfig) -> Result<PathBuf> {
    let index_store = open_store(&config.index_dir)?;
    let names = discovery::list_indexes(&index_store, "").await?;
    info!(
        index_dir = %config.index_dir.display(),
        count = names.len(),
        "계절성 계산 시작"
    );

    let calculator = SeasonalityCalculator::new();
    let pb = progress_bar(names.len(), config.show_progress)?;

    let mut records: Vec<SeasonalityRecord> = Vec::with_capacity(names.len());
    let mut failed = 0;
    for name in &names {
        pb.set_message(name.clone());
        match loader::load_stock_bars(&index_store, &paths::index_path("", name)).await {
            Ok(bars) => match calculator.calculate(name, name, &bars) {
                Ok(record) => records.push(record),
                Err(e) => warn!(index = %name, reason = %e, "데이터 부족, 건너뜀"),
            },
            Err(e) => {
                warn!(index = %name, error = %e, "지수 로드 실패, 건너뜀");
                failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("완료");

    let content = codec::write_records(&SeasonalityRecord::csv_header(), &records)?;

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("출력 디렉터리 생성 실패: {}", config.output_dir.display()))?;
    let output_store = open_store(&config.output_dir)?;
    loader::upload_csv(&output_store, OUTPUT_FILE_NAME, &content)
        .await
        .context("결과 파일 기록 실패")?;

    let output = config.output_dir.join(OUTPUT_FILE_NAME);
    debug!(path = %output.display(), "결과 파일 기록");
    info!(indexes = records.len(), failed, "계절성 계산 완료");
    Ok(output)
}
