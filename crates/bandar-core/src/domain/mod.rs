//! 집계 작업을 위한 도메인 모델.

mod broker;
mod job;
mod market_data;
mod rrg;
mod seasonality;
mod trend;

pub mod serde_format;

pub use broker::*;
pub use job::*;
pub use market_data::*;
pub use rrg::*;
pub use seasonality::*;
pub use trend::*;
