//! 분석 오류 타입.

use thiserror::Error;

/// 계산기 오류.
#[derive(Debug, Error, PartialEq)]
pub enum AnalyticsError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

impl AnalyticsError {
    /// 건너뛰어도 되는 입력 부족 오류인지 여부
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

/// 분석 결과 타입
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
