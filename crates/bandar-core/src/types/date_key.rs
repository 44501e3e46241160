//! 블롭 경로에 쓰이는 압축 날짜 키.
//!
//! 브로커 거래 폴더는 `broker_transaction_<YYMMDD>` 또는 `broker_transaction_<YYYYMMDD>`
//! 형식을 사용합니다. `DateKey`는 원래 자릿수를 기억하여 같은 형식으로 다시 출력합니다.
//!
//! 2자리 연도는 항상 20xx로 해석합니다.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::CoreError;

/// 날짜 키 자릿수.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateWidth {
    /// YYMMDD
    Short,
    /// YYYYMMDD
    Long,
}

/// 6/8자리 날짜 키.
///
/// 동등성과 정렬은 날짜만 비교합니다.
#[derive(Debug, Clone, Copy)]
pub struct DateKey {
    date: NaiveDate,
    width: DateWidth,
}

impl DateKey {
    /// 날짜와 자릿수로 생성
    pub fn new(date: NaiveDate, width: DateWidth) -> Self {
        Self { date, width }
    }

    /// 6/8자리 숫자 문자열 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        match s.len() {
            6 => {
                let yy: i32 = s[0..2].parse().ok()?;
                let mm: u32 = s[2..4].parse().ok()?;
                let dd: u32 = s[4..6].parse().ok()?;
                NaiveDate::from_ymd_opt(2000 + yy, mm, dd).map(|d| Self::new(d, DateWidth::Short))
            }
            8 => NaiveDate::parse_from_str(s, "%Y%m%d")
                .ok()
                .map(|d| Self::new(d, DateWidth::Long)),
            _ => None,
        }
    }

    /// 달력 날짜
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// 자릿수
    pub fn width(&self) -> DateWidth {
        self.width
    }

    /// 하루 전 달력 날짜 (같은 자릿수 유지).
    ///
    /// 주말/공휴일 여부는 고려하지 않습니다. 6자리 키가 2000년 이전으로 넘어가면
    /// 20xx 해석과 겹치지 않도록 8자리로 바꿉니다.
    pub fn previous_calendar_day(&self) -> Self {
        let date = self.date - Duration::days(1);
        let width = match self.width {
            DateWidth::Short if date.year() < 2000 => DateWidth::Long,
            width => width,
        };
        Self { date, width }
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.width {
            DateWidth::Short => write!(
                f,
                "{:02}{:02}{:02}",
                self.date.year().rem_euclid(100),
                self.date.month(),
                self.date.day()
            ),
            DateWidth::Long => write!(f, "{}", self.date.format("%Y%m%d")),
        }
    }
}

impl FromStr for DateKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::InvalidDate(s.to_string()))
    }
}

impl PartialEq for DateKey {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

impl Eq for DateKey {}

impl Hash for DateKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.date.hash(state);
    }
}

impl PartialOrd for DateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 주가 CSV의 날짜 문자열 파싱.
///
/// `YYYY-MM-DD`, `YYYY/MM/DD`, `DD/MM/YYYY`, ISO 타임스탬프의 날짜 부분, 6/8자리 키를 지원합니다.
pub fn parse_bar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);

    ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .or_else(|| DateKey::parse(date_part).map(|k| k.date()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_and_long() {
        let short = DateKey::parse("240102").unwrap();
        assert_eq!(short.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(short.width(), DateWidth::Short);
        assert_eq!(short.to_string(), "240102");

        let long = DateKey::parse("20240102").unwrap();
        assert_eq!(long.width(), DateWidth::Long);
        assert_eq!(long.to_string(), "20240102");
        assert_eq!(short, long);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(DateKey::parse("2401").is_none());
        assert!(DateKey::parse("24013a").is_none());
        assert!(DateKey::parse("241301").is_none());
        assert!(DateKey::parse("240230").is_none());
        assert!("1234567".parse::<DateKey>().is_err());
    }

    #[test]
    fn test_previous_calendar_day_within_month() {
        let key = DateKey::parse("240115").unwrap();
        assert_eq!(key.previous_calendar_day().to_string(), "240114");
    }

    #[test]
    fn test_previous_calendar_day_crosses_month_and_year() {
        assert_eq!(
            DateKey::parse("240301").unwrap().previous_calendar_day().to_string(),
            "240229"
        );
        assert_eq!(
            DateKey::parse("230301").unwrap().previous_calendar_day().to_string(),
            "230228"
        );
        assert_eq!(
            DateKey::parse("240101").unwrap().previous_calendar_day().to_string(),
            "231231"
        );
        assert_eq!(
            DateKey::parse("20000101")
                .unwrap()
                .previous_calendar_day()
                .to_string(),
            "19991231"
        );
    }

    #[test]
    fn test_previous_calendar_day_widens_before_2000() {
        let first = DateKey::parse("000101").unwrap();
        let baseline = first.previous_calendar_day();

        assert_eq!(baseline.to_string(), "19991231");
        assert_eq!(baseline.width(), DateWidth::Long);
        assert!(baseline < first);
        assert_eq!(DateKey::parse(&baseline.to_string()), Some(baseline));
    }

    #[test]
    fn test_previous_calendar_day_ignores_weekends() {
        // 2024-01-08은 월요일 → 일요일
        let key = DateKey::parse("240108").unwrap();
        assert_eq!(key.previous_calendar_day().to_string(), "240107");
    }

    #[test]
    fn test_ordering_by_date() {
        let mut keys: Vec<DateKey> = ["240105", "20240103", "240104"]
            .iter()
            .filter_map(|s| DateKey::parse(s))
            .collect();
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(rendered, vec!["20240103", "240104", "240105"]);
    }

    #[test]
    fn test_parse_bar_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_bar_date("2024-03-05"), Some(expected));
        assert_eq!(parse_bar_date("2024/03/05"), Some(expected));
        assert_eq!(parse_bar_date("05/03/2024"), Some(expected));
        assert_eq!(parse_bar_date("2024-03-05T00:00:00Z"), Some(expected));
        assert_eq!(parse_bar_date("240305"), Some(expected));
        assert_eq!(parse_bar_date("garbage"), None);
    }
}
