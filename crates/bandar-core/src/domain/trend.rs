//! 추세 필터 결과.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::serde_format;

/// 추세 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Uptrend,
    Sideways,
    Downtrend,
}

impl Trend {
    /// 모든 분류 (요약 출력 순서)
    pub const ALL: [Trend; 3] = [Trend::Uptrend, Trend::Sideways, Trend::Downtrend];

    /// 점수에서 분류: ≥2 상승, ≤-2 하락, 그 외 횡보
    pub fn from_score(score: i32) -> Self {
        if score >= 2 {
            Self::Uptrend
        } else if score <= -2 {
            Self::Downtrend
        } else {
            Self::Sideways
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uptrend => "Uptrend",
            Self::Sideways => "Sideways",
            Self::Downtrend => "Downtrend",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 추세 판단 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendPeriod {
    /// 3거래일
    #[serde(rename = "3D")]
    D3,
    /// 5거래일
    #[serde(rename = "5D")]
    D5,
    /// 2주 (14거래일)
    #[serde(rename = "2W")]
    W2,
    /// 1개월 (30거래일)
    #[serde(rename = "1M")]
    M1,
}

impl TrendPeriod {
    /// 기본 기간 목록
    pub const ALL: [TrendPeriod; 4] = [
        TrendPeriod::D3,
        TrendPeriod::D5,
        TrendPeriod::W2,
        TrendPeriod::M1,
    ];

    /// 필요한 봉 수
    pub fn days(&self) -> usize {
        match self {
            Self::D3 => 3,
            Self::D5 => 5,
            Self::W2 => 14,
            Self::M1 => 30,
        }
    }

    /// 파일명/CSV 레이블
    pub fn label(&self) -> &'static str {
        match self {
            Self::D3 => "3D",
            Self::D5 => "5D",
            Self::W2 => "2W",
            Self::M1 => "1M",
        }
    }
}

impl fmt::Display for TrendPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 종목별 추세 결과 (`o1-trend-<period>.csv`의 한 행).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRecord {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Change%", serialize_with = "serde_format::fixed2")]
    pub change_pct: f64,
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Trend")]
    pub trend: Trend,
    #[serde(skip)]
    pub period: TrendPeriod,
}

impl TrendRecord {
    /// CSV 헤더
    pub const CSV_HEADER: [&'static str; 6] =
        ["Symbol", "Name", "Price", "Change%", "Sector", "Trend"];
}

/// 기간별 추세 분포 (`trend-summary.csv`의 한 행).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    #[serde(rename = "Period")]
    pub period: TrendPeriod,
    #[serde(rename = "Total")]
    pub total: usize,
    #[serde(rename = "Uptrend")]
    pub uptrend: usize,
    #[serde(rename = "Sideways")]
    pub sideways: usize,
    #[serde(rename = "Downtrend")]
    pub downtrend: usize,
    #[serde(rename = "UptrendPct", serialize_with = "serde_format::fixed2")]
    pub uptrend_pct: f64,
    #[serde(rename = "SidewaysPct", serialize_with = "serde_format::fixed2")]
    pub sideways_pct: f64,
    #[serde(rename = "DowntrendPct", serialize_with = "serde_format::fixed2")]
    pub downtrend_pct: f64,
}

impl TrendSummary {
    /// CSV 헤더
    pub const CSV_HEADER: [&'static str; 8] = [
        "Period",
        "Total",
        "Uptrend",
        "Sideways",
        "Downtrend",
        "UptrendPct",
        "SidewaysPct",
        "DowntrendPct",
    ];
}
