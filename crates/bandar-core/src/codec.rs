//! 공용 CSV 코덱.
//!
//! 모든 집계 작업이 같은 파서를 사용합니다. RFC4180의 부분집합을 지원합니다:
//! - 따옴표로 감싼 필드 (`"a,b"`는 하나의 필드)
//! - 빈 줄 무시
//! - 헤더보다 필드 수가 적은 줄 무시
//! - 숫자 변환 실패 시 0으로 대체 (`*_or_zero` 접근자)
//!
//! # 사용 예
//!
//! ```rust
//! use bandar_core::codec;
//!
//! let rows = codec::parse("Symbol,Sector\nBBCA,\"Financials, Banks\"\n");
//! assert_eq!(rows[0].get("sector"), Some("Financials, Banks"));
//!
//! let text = codec::serialize(&rows).unwrap();
//! assert_eq!(codec::parse(&text), rows);
//! ```

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::CoreResult;

/// 헤더 순서를 유지하는 CSV 행.
///
/// 헤더는 같은 파일의 모든 행이 공유합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl CsvRow {
    /// 헤더와 값으로 행 생성. 값이 부족하면 빈 문자열로 채웁니다.
    pub fn new(headers: Arc<[String]>, mut values: Vec<String>) -> Self {
        values.resize(headers.len(), String::new());
        Self { headers, values }
    }

    /// (키, 값) 쌍 목록으로 행 생성.
    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: Vec<(K, V)>) -> Self {
        let (headers, values): (Vec<String>, Vec<String>) =
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).unzip();
        Self {
            headers: headers.into(),
            values,
        }
    }

    /// 헤더 목록
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// 값 목록 (헤더 순서)
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// 위치로 값 조회
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// 헤더 이름으로 값 조회 (대소문자 무시).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .map(|i| self.values[i].as_str())
    }

    /// 후보 헤더 중 처음 존재하는 값 조회.
    pub fn get_any(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get(name))
    }

    /// f64 값 (없거나 변환 실패 시 0)
    pub fn f64_or_zero(&self, names: &[&str]) -> f64 {
        self.get_any(names).map(parse_f64_or_zero).unwrap_or(0.0)
    }

    /// i64 값 (없거나 변환 실패 시 0)
    pub fn i64_or_zero(&self, names: &[&str]) -> i64 {
        self.get_any(names).map(parse_i64_or_zero).unwrap_or(0)
    }

    /// Decimal 값 (없거나 변환 실패 시 0)
    pub fn decimal_or_zero(&self, names: &[&str]) -> Decimal {
        self.get_any(names)
            .map(parse_decimal_or_zero)
            .unwrap_or(Decimal::ZERO)
    }
}

/// CSV 텍스트를 헤더 기반 행 목록으로 파싱.
///
/// 첫 줄은 헤더입니다. 필드는 앞뒤 공백이 제거됩니다.
pub fn parse(text: &str) -> Vec<CsvRow> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Arc<[String]> = match reader.headers() {
        Ok(record) => record
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect(),
        Err(e) => {
            debug!(error = %e, "CSV 헤더 파싱 실패");
            return Vec::new();
        }
    };

    if headers.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "CSV 행 건너뜀");
                continue;
            }
        };

        if record.len() < headers.len() {
            continue;
        }

        let values = record
            .iter()
            .take(headers.len())
            .map(str::to_string)
            .collect();
        rows.push(CsvRow {
            headers: Arc::clone(&headers),
            values,
        });
    }

    rows
}

/// 헤더 없이 위치 기반으로 파싱.
///
/// 첫 줄의 값이 숫자가 하나도 없으면 헤더로 간주하고 건너뜁니다.
/// `min_fields`보다 짧은 줄은 무시합니다.
pub fn parse_positional(text: &str, min_fields: usize) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let Ok(record) = result else {
            continue;
        };

        if idx == 0 && looks_like_header(&record) {
            continue;
        }

        if record.len() < min_fields {
            continue;
        }

        rows.push(record.iter().map(str::to_string).collect());
    }

    rows
}

fn looks_like_header(record: &csv::StringRecord) -> bool {
    record.iter().skip(1).all(|f| f.parse::<f64>().is_err())
}

/// 행 목록을 CSV 텍스트로 직렬화.
///
/// 첫 번째 행의 헤더를 사용합니다. 다른 행에 해당 헤더가 없으면 빈 값으로 씁니다.
/// 쉼표/따옴표/개행이 있는 필드만 따옴표로 감쌉니다.
pub fn serialize(rows: &[CsvRow]) -> CoreResult<String> {
    let Some(first) = rows.first() else {
        return Ok(String::new());
    };

    let mut writer = writer();
    writer.write_record(first.headers())?;
    for row in rows {
        let record: Vec<&str> = first
            .headers()
            .iter()
            .map(|h| row.get(h).unwrap_or(""))
            .collect();
        writer.write_record(&record)?;
    }

    finish(writer)
}

/// 타입이 있는 레코드를 헤더와 함께 CSV 텍스트로 직렬화.
///
/// 레코드가 비어 있어도 헤더는 기록됩니다.
pub fn write_records<T: Serialize>(header: &[&str], records: &[T]) -> CoreResult<String> {
    let mut writer = writer();
    writer.write_record(header)?;
    for record in records {
        writer.serialize(record)?;
    }
    finish(writer)
}

fn writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> CoreResult<String> {
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

/// 숫자 문자열 정리 (천 단위 구분자, 퍼센트 기호 제거)
fn clean_number(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != ',' && *c != '%' && *c != '_')
        .collect()
}

/// f64 파싱 (실패 시 0)
pub fn parse_f64_or_zero(raw: &str) -> f64 {
    clean_number(raw)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// i64 파싱 (소수점 표기 허용, 실패 시 0)
pub fn parse_i64_or_zero(raw: &str) -> i64 {
    let cleaned = clean_number(raw);
    cleaned
        .parse::<i64>()
        .ok()
        .or_else(|| {
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.round() as i64)
        })
        .unwrap_or(0)
}

/// Decimal 파싱 (실패 시 0)
pub fn parse_decimal_or_zero(raw: &str) -> Decimal {
    let cleaned = clean_number(raw);
    cleaned
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .unwrap_or(Decimal::ZERO)
}

/// 소수점 N자리 반올림
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
