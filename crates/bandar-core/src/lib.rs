//! # Bandar Core
//!
//! 브로커 수급(bandarmology) 배치 집계 작업의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 작업 전반에서 사용되는 기본 타입을 제공합니다:
//! - 주가 봉, 브로커 거래/인벤토리 레코드
//! - 추세, 계절성, RRG 결과 레코드
//! - 스케줄러 로그 모델
//! - 6/8자리 날짜 키 (`DateKey`)
//! - 공용 CSV 코덱
//! - 설정 섹션 및 로깅 인프라

pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use codec::CsvRow;
pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
