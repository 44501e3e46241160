//! RRG (Relative Rotation Graph) 레코드.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::serde_format;
use crate::codec::CsvRow;
use crate::types::parse_bar_date;

/// RRG 사분면 기반 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RrgTrend {
    Strong,
    Improving,
    Weakening,
    Weak,
    Neutral,
}

impl RrgTrend {
    /// 고정 판정표.
    ///
    /// | RS-Ratio | RS-Momentum | 성과 | 결과 |
    /// |----------|-------------|------|------|
    /// | > 100    | > 100       | > 0  | STRONG |
    /// | < 100    | > 100       |      | IMPROVING |
    /// | > 100    | < 100       |      | WEAKENING |
    /// | < 100    | < 100       |      | WEAK |
    /// | 그 외    |             |      | NEUTRAL |
    pub fn classify(rs_ratio: f64, rs_momentum: f64, performance: f64) -> Self {
        if rs_ratio > 100.0 && rs_momentum > 100.0 && performance > 0.0 {
            Self::Strong
        } else if rs_ratio < 100.0 && rs_momentum > 100.0 {
            Self::Improving
        } else if rs_ratio > 100.0 && rs_momentum < 100.0 {
            Self::Weakening
        } else if rs_ratio < 100.0 && rs_momentum < 100.0 {
            Self::Weak
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "STRONG",
            Self::Improving => "IMPROVING",
            Self::Weakening => "WEAKENING",
            Self::Weak => "WEAK",
            Self::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for RrgTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 종목의 특정 일자 RS-Ratio / RS-Momentum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RrgPoint {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "RS-Ratio", serialize_with = "serde_format::fixed4")]
    pub rs_ratio: f64,
    #[serde(rename = "RS-Momentum", serialize_with = "serde_format::fixed4")]
    pub rs_momentum: f64,
}

impl RrgPoint {
    /// CSV 헤더
    pub const CSV_HEADER: [&'static str; 3] = ["Date", "RS-Ratio", "RS-Momentum"];

    /// CSV 행에서 생성 (`RS-Ratio`/`rs_ratio` 헤더 모두 허용).
    pub fn from_row(row: &CsvRow) -> Option<Self> {
        let date = parse_bar_date(row.get_any(&["Date", "date"])?)?;
        let rs_ratio = row.get_any(&["RS-Ratio", "rs_ratio", "RSRatio"])?;
        let rs_momentum = row.get_any(&["RS-Momentum", "rs_momentum", "RSMomentum"])?;

        Some(Self {
            date,
            rs_ratio: rs_ratio.parse().ok()?,
            rs_momentum: rs_momentum.parse().ok()?,
        })
    }

    /// 가장 최근 일자의 포인트.
    pub fn latest(rows: &[CsvRow]) -> Option<Self> {
        rows.iter()
            .filter_map(Self::from_row)
            .max_by_key(|p| p.date)
    }
}

/// RRG 스캐너 결과 (`o3-rrg.csv`의 한 행).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RrgScannerRecord {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "RS-Ratio", serialize_with = "serde_format::fixed2")]
    pub rs_ratio: f64,
    #[serde(rename = "RS-Momentum", serialize_with = "serde_format::fixed2")]
    pub rs_momentum: f64,
    #[serde(rename = "Performance", serialize_with = "serde_format::signed_percent")]
    pub performance: f64,
    #[serde(rename = "Trend")]
    pub trend: RrgTrend,
}

impl RrgScannerRecord {
    /// CSV 헤더
    pub const CSV_HEADER: [&'static str; 6] = [
        "Symbol",
        "Sector",
        "RS-Ratio",
        "RS-Momentum",
        "Performance",
        "Trend",
    ];
}
