//! 지수 계절성 결과.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::types::{month_label, MONTH_LABELS};

/// 지수별 월별 평균 일간 수익률.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityRecord {
    /// 지수 코드
    pub ticker: String,
    /// 지수명
    pub name: String,
    /// 월별 평균 일간 수익률 (%, 1월..12월)
    pub monthly_returns: [f64; 12],
    /// 최고 월 (0부터 시작)
    pub best_month: usize,
    /// 최저 월 (0부터 시작)
    pub worst_month: usize,
    /// 월별 평균의 모표준편차
    pub volatility: f64,
}

impl SeasonalityRecord {
    /// CSV 헤더 (`Ticker,Name,Jan..Dec,BestMonth,BestReturn,WorstMonth,WorstReturn,Volatility`)
    pub fn csv_header() -> Vec<&'static str> {
        let mut header = vec!["Ticker", "Name"];
        header.extend(MONTH_LABELS);
        header.extend([
            "BestMonth",
            "BestReturn",
            "WorstMonth",
            "WorstReturn",
            "Volatility",
        ]);
        header
    }

    /// 최고 월 평균 수익률
    pub fn best_return(&self) -> f64 {
        self.monthly_returns[self.best_month]
    }

    /// 최저 월 평균 수익률
    pub fn worst_return(&self) -> f64 {
        self.monthly_returns[self.worst_month]
    }
}

impl Serialize for SeasonalityRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(19))?;
        seq.serialize_element(&self.ticker)?;
        seq.serialize_element(&self.name)?;
        for value in &self.monthly_returns {
            seq.serialize_element(&format!("{:.2}", value))?;
        }
        seq.serialize_element(month_label(self.best_month))?;
        seq.serialize_element(&format!("{:.2}", self.best_return()))?;
        seq.serialize_element(month_label(self.worst_month))?;
        seq.serialize_element(&format!("{:.2}", self.worst_return()))?;
        seq.serialize_element(&format!("{:.2}", self.volatility))?;
        seq.end()
    }
}
