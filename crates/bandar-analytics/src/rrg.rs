//! RRG (Relative Rotation Graph) 계산.
//!
//! # 계산 공식
//!
//! - **RS**: 100 × 종목 종가 / 벤치마크 종가
//! - **RS-Ratio**: 100 × RS / SMA(RS, w)
//! - **RS-Momentum**: 100 × RS-Ratio / SMA(RS-Ratio, w)
//!
//! 스캐너는 종목별 최신 RS-Ratio/RS-Momentum과 최근 수익률로 사분면을 분류합니다.

use std::collections::HashMap;

use bandar_core::{RrgPoint, RrgScannerRecord, RrgTrend, StockBar};
use chrono::NaiveDate;
use tracing::trace;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::series::mean;

/// 성과 계산 기준 거래일 수
const PERFORMANCE_LOOKBACK: usize = 5;

/// 섹터를 찾지 못한 종목의 섹터명
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// 종목별 RS-Ratio / RS-Momentum 시계열 계산기.
#[derive(Debug, Clone, Copy)]
pub struct RrgCalculator {
    window: usize,
}

impl Default for RrgCalculator {
    fn default() -> Self {
        Self { window: 10 }
    }
}

impl RrgCalculator {
    /// 이동평균 창 크기를 지정하여 생성.
    pub fn new(window: usize) -> AnalyticsResult<Self> {
        if window == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "RRG 창 크기는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// 종목과 벤치마크 봉을 날짜로 맞춰 RRG 시계열 계산 (날짜 오름차순).
    ///
    /// 벤치마크 종가가 0인 날은 제외합니다. 두 창이 모두 채워진 날부터 포인트가 생기며,
    /// 하나도 없으면 `InsufficientData`.
    pub fn calculate(
        &self,
        stock: &[StockBar],
        benchmark: &[StockBar],
    ) -> AnalyticsResult<Vec<RrgPoint>> {
        let bench: HashMap<NaiveDate, f64> = benchmark
            .iter()
            .filter(|b| b.close != 0.0)
            .map(|b| (b.date, b.close))
            .collect();

        let mut joined: Vec<(NaiveDate, f64)> = stock
            .iter()
            .filter_map(|bar| bench.get(&bar.date).map(|c| (bar.date, 100.0 * bar.close / c)))
            .collect();
        joined.sort_by_key(|(date, _)| *date);
        trace!(stock = stock.len(), joined = joined.len(), "벤치마크 날짜 결합");

        let required = self.window * 2 - 1;
        let rs: Vec<f64> = joined.iter().map(|(_, v)| *v).collect();
        let ratios = relative_to_sma(&rs, self.window);
        let ratio_values: Vec<f64> = ratios.iter().map(|(_, v)| *v).collect();
        let momentums = relative_to_sma(&ratio_values, self.window);

        let points: Vec<RrgPoint> = momentums
            .into_iter()
            .map(|(ratio_idx, rs_momentum)| {
                let (rs_idx, rs_ratio) = ratios[ratio_idx];
                RrgPoint {
                    date: joined[rs_idx].0,
                    rs_ratio,
                    rs_momentum,
                }
            })
            .collect();

        if points.is_empty() {
            return Err(AnalyticsError::InsufficientData {
                required,
                provided: joined.len(),
            });
        }
        Ok(points)
    }
}

/// `100 × v / SMA(v, window)` 값과 원래 위치. 창이 차지 않았거나 SMA가 0이면 제외.
fn relative_to_sma(values: &[f64], window: usize) -> Vec<(usize, f64)> {
    if values.len() < window {
        return Vec::new();
    }
    (window - 1..values.len())
        .filter_map(|i| {
            let sma = mean(&values[i + 1 - window..=i]);
            (sma != 0.0).then(|| (i, 100.0 * values[i] / sma))
        })
        .collect()
}

/// 최근 수익률 (%).
///
/// 마지막 종가와 `min(5, n-1)`봉 전 종가를 비교합니다. 봉이 2개 미만이거나 기준 종가가
/// 0이면 0입니다.
pub fn performance(closes: &[f64]) -> f64 {
    let n = closes.len();
    if n < 2 {
        return 0.0;
    }
    let k = PERFORMANCE_LOOKBACK.min(n - 1);
    let base = closes[n - 1 - k];
    if base == 0.0 {
        return 0.0;
    }
    (closes[n - 1] - base) / base * 100.0
}

/// RRG 스캐너 레코드 생성기.
#[derive(Debug, Default, Clone, Copy)]
pub struct RrgScanner;

impl RrgScanner {
    pub fn new() -> Self {
        Self
    }

    /// 종목 한 개의 스캐너 레코드.
    ///
    /// 섹터를 찾지 못하면 `Unknown`, 주가가 없으면 성과 0으로 분류합니다.
    pub fn scan(
        &self,
        symbol: &str,
        sector: Option<&str>,
        point: &RrgPoint,
        bars: &[StockBar],
    ) -> RrgScannerRecord {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let performance = performance(&closes);

        RrgScannerRecord {
            symbol: symbol.to_string(),
            sector: sector.unwrap_or(UNKNOWN_SECTOR).to_string(),
            rs_ratio: point.rs_ratio,
            rs_momentum: point.rs_momentum,
            performance,
            trend: RrgTrend::classify(point.rs_ratio, point.rs_momentum, performance),
        }
    }
}

/// RS-Ratio 내림차순 정렬 (같으면 종목 코드순).
pub fn sort_by_rs_ratio_desc(records: &mut [RrgScannerRecord]) {
    records.sort_by(|a, b| {
        b.rs_ratio
            .total_cmp(&a.rs_ratio)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
}
