//! 배치 집계용 순수 계산기.
//!
//! 이 크레이트는 저장소나 런타임에 의존하지 않고 다음을 계산합니다:
//! - 브로커 인벤토리 누적 시계열
//! - 브로커 유형별 일간 요약
//! - 기간별 추세 점수와 분류
//! - 지수 월별 계절성
//! - RRG (RS-Ratio / RS-Momentum) 및 스캐너 분류
//!
//! 입출력은 `bandar-collector`가 담당합니다.

pub mod broker_summary;
pub mod error;
pub mod inventory;
pub mod rrg;
pub mod seasonality;
pub mod series;
pub mod trend;

pub use broker_summary::summarize_by_type;
pub use error::{AnalyticsError, AnalyticsResult};
pub use inventory::{build_inventory_series, DailyVolume, InventoryAccumulator, InventoryKey};
pub use rrg::{performance, sort_by_rs_ratio_desc, RrgCalculator, RrgScanner};
pub use seasonality::SeasonalityCalculator;
pub use trend::{sort_by_change_desc, TrendCalculator, TrendSignal};
