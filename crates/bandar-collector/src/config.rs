//! 파일/환경변수 기반 설정 모듈.
//!
//! 우선순위는 기본값 < 설정 파일(TOML) < 환경변수입니다.
//! 환경변수는 `BANDAR__<SECTION>__<KEY>` 형식입니다 (예: `BANDAR__AGGREGATOR__BATCH_SIZE=20`).

use std::path::Path;
use std::time::Duration;

use bandar_core::{AggregatorConfig, AnalysisConfig, LoggingConfig, SchedulerConfig, StorageConfig};
use serde::{Deserialize, Serialize};

use crate::Result;

/// 환경변수 접두사
const ENV_PREFIX: &str = "BANDAR";

/// Collector 전체 설정
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// 블롭 저장소 설정
    pub storage: StorageConfig,
    /// 집계 작업 공통 설정
    pub aggregator: AggregatorConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 스케줄러 설정
    pub scheduler: SchedulerConfig,
    /// 분석 파라미터
    pub analysis: AnalysisConfig,
}

impl CollectorConfig {
    /// 설정 로드.
    ///
    /// `.env`가 있으면 먼저 읽습니다. `path`가 주어졌는데 파일이 없으면 에러입니다.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        tracing::debug!(root_dir = %config.storage.root_dir, "설정 로드 완료");
        Ok(config)
    }

    /// 데몬 실행 주기 (최소 1분)
    pub fn daemon_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.interval_minutes.max(1) * 60)
    }
}
