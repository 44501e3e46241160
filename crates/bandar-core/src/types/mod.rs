//! 집계 작업 전반에서 사용되는 공통 타입.

mod date_key;
mod month;

pub use date_key::*;
pub use month::*;
