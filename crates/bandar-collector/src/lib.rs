//! Bandarmology 배치 집계 작업.
//!
//! 이 crate는 블롭 저장소의 CSV를 읽어 파생 CSV를 다시 쓰는 작업들을 제공합니다:
//! - 브로커 인벤토리 / 브로커 유형별 요약
//! - 기간별 추세 필터
//! - 지수 계절성
//! - RRG 계산 및 스캐너
//!
//! 각 작업은 스케줄러 로그(`JobLogger`)에 진행 상황과 결과를 기록합니다.

pub mod config;
pub mod error;
pub mod job_log;
pub mod modules;
pub mod runner;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use job_log::{run_job, JobLogger, MemoryJobLog, PgJobLog, ProgressReporter};
pub use runner::JobRunner;
pub use stats::JobStats;
