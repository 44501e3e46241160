//! 주가 일봉 데이터.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codec::CsvRow;
use crate::types::parse_bar_date;

/// 종목별 일봉 한 건.
///
/// `stock/<sector>/<ticker>.csv`, `index/<name>.csv`의 한 행에 해당합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBar {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: f64,
    /// 고가
    pub high: f64,
    /// 저가
    pub low: f64,
    /// 종가
    pub close: f64,
    /// 거래량
    pub volume: i64,
    /// 거래대금
    pub value: f64,
    /// 체결 건수
    pub frequency: i64,
    /// 등락률 (%)
    pub change_percent: f64,
}

impl StockBar {
    /// 종가만 있는 봉 생성 (테스트 및 합성 데이터용).
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
            value: 0.0,
            frequency: 0,
            change_percent: 0.0,
        }
    }

    /// CSV 행에서 봉 생성.
    ///
    /// 날짜를 해석할 수 없으면 `None`. 숫자 필드는 실패 시 0입니다.
    pub fn from_row(row: &CsvRow) -> Option<Self> {
        let date = parse_bar_date(row.get_any(&["Date", "Tanggal", "Time"])?)?;

        Some(Self {
            date,
            open: row.f64_or_zero(&["Open"]),
            high: row.f64_or_zero(&["High"]),
            low: row.f64_or_zero(&["Low"]),
            close: row.f64_or_zero(&["Close"]),
            volume: row.i64_or_zero(&["Volume"]),
            value: row.f64_or_zero(&["Value"]),
            frequency: row.i64_or_zero(&["Frequency", "Freq"]),
            change_percent: row.f64_or_zero(&["ChangePercent", "Change%", "Change"]),
        })
    }

    /// CSV 행 목록에서 날짜 오름차순 봉 목록 생성.
    ///
    /// 같은 날짜가 여러 번 나오면 마지막 행을 사용합니다.
    pub fn series_from_rows(rows: &[CsvRow]) -> Vec<Self> {
        let mut bars: Vec<Self> = rows.iter().filter_map(Self::from_row).collect();
        bars.sort_by_key(|b| b.date);

        let mut deduped: Vec<Self> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        deduped
    }
}
