//! 설정 섹션 정의.
//!
//! 각 집계 작업은 생성 시 명시적인 설정 구조체를 받습니다.
//! 로딩(파일/환경 변수 병합)은 collector 크레이트에서 수행합니다.

use serde::{Deserialize, Serialize};

/// 집계 작업 공통 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// 지수 CSV 디렉터리 (블롭 접두사)
    pub index_dir: String,
    /// 계절성 결과 디렉터리 (블롭 접두사)
    pub output_dir: String,
    /// 동시에 로드할 날짜 수 (배치 크기)
    pub batch_size: usize,
    /// 종목/파일 단위 최대 동시 작업 수
    pub max_concurrency: usize,
    /// 로드된 레코드 메모리 경고 임계치 (MB)
    pub gc_threshold_mb: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            index_dir: "index".to_string(),
            output_dir: "seasonal_output".to_string(),
            batch_size: 10,
            max_concurrency: 16,
            gc_threshold_mb: 10_240,
        }
    }
}

impl AggregatorConfig {
    /// 0이 아닌 배치 크기
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    /// 0이 아닌 동시 작업 수
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }

    /// 메모리 임계치 (바이트)
    pub fn gc_threshold_bytes(&self) -> u64 {
        self.gc_threshold_mb.saturating_mul(1024 * 1024)
    }
}

/// 블롭 저장소 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 파일시스템 저장소 루트 디렉터리
    pub root_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: "data".to_string(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 스케줄러 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// 스케줄러 로그 DB (없으면 메모리 로그)
    pub database_url: Option<String>,
    /// 데몬 모드 실행 주기 (분)
    pub interval_minutes: u64,
    /// 로그에 기록할 실행 주체
    pub triggered_by: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            interval_minutes: 60,
            triggered_by: "system".to_string(),
        }
    }
}

/// 분석 파라미터.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 섹터 폴더명 목록 (`stock/<sector>/`), 탐색 순서
    pub sectors: Vec<String>,
    /// RRG 벤치마크 지수명 (`index/<name>.csv`)
    pub rrg_benchmark: String,
    /// RS-Ratio / RS-Momentum 이동평균 기간
    pub rrg_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sectors: DEFAULT_SECTORS.iter().map(|s| s.to_string()).collect(),
            rrg_benchmark: "COMPOSITE".to_string(),
            rrg_window: 10,
        }
    }
}

/// IDX-IC 섹터 폴더명.
pub const DEFAULT_SECTORS: [&str; 11] = [
    "Basic Materials",
    "Consumer Cyclicals",
    "Consumer Non-Cyclicals",
    "Energy",
    "Financials",
    "Healthcare",
    "Industrials",
    "Infrastructures",
    "Properties & Real Estate",
    "Technology",
    "Transportation & Logistic",
];
