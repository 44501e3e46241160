//! 지수 월별 계절성 계산.
//!
//! 연속한 두 봉의 일간 수익률을 뒤 봉의 달(1월..12월)로 묶어 평균합니다.
//! 연도와 관계없이 같은 달은 하나로 합칩니다.

use bandar_core::codec::round_to;
use bandar_core::{SeasonalityRecord, StockBar};
use chrono::Datelike;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::series::{mean, population_std_dev};

/// 계절성 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeasonalityCalculator;

impl SeasonalityCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 날짜 오름차순 봉 목록으로 지수 한 개의 계절성 계산.
    ///
    /// 봉이 2개 미만이면 `InsufficientData`. 전일 종가가 0인 수익률은 건너뜁니다.
    pub fn calculate(
        &self,
        ticker: &str,
        name: &str,
        bars: &[StockBar],
    ) -> AnalyticsResult<SeasonalityRecord> {
        if bars.len() < 2 {
            return Err(AnalyticsError::InsufficientData {
                required: 2,
                provided: bars.len(),
            });
        }

        let mut buckets: [Vec<f64>; 12] = Default::default();
        for pair in bars.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            if prev.close == 0.0 {
                continue;
            }
            let month = curr.date.month0() as usize;
            buckets[month].push((curr.close - prev.close) / prev.close);
        }

        let mut monthly_returns = [0.0; 12];
        for (slot, returns) in monthly_returns.iter_mut().zip(&buckets) {
            if !returns.is_empty() {
                *slot = round_to(mean(returns) * 100.0, 2);
            }
        }

        Ok(SeasonalityRecord {
            ticker: ticker.to_string(),
            name: name.to_string(),
            best_month: first_extreme(&monthly_returns, |candidate, best| candidate > best),
            worst_month: first_extreme(&monthly_returns, |candidate, worst| candidate < worst),
            volatility: round_to(population_std_dev(&monthly_returns), 2),
            monthly_returns,
        })
    }
}

/// 조건을 처음 만족하는 극값의 위치 (동률은 앞선 달).
fn first_extreme(values: &[f64; 12], better: impl Fn(f64, f64) -> bool) -> usize {
    let mut index = 0;
    for (i, value) in values.iter().enumerate().skip(1) {
        if better(*value, values[index]) {
            index = i;
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(y: i32, m: u32, d: u32, close: f64) -> StockBar {
        StockBar::from_close(NaiveDate::from_ymd_opt(y, m, d).unwrap(), close)
    }

    #[test]
    fn test_single_month_return() {
        let bars = vec![bar(2024, 1, 30, 100.0), bar(2024, 2, 1, 110.0)];
        let record = SeasonalityCalculator::new()
            .calculate("COMPOSITE", "Composite", &bars)
            .unwrap();

        assert_eq!(record.monthly_returns[1], 10.0);
        assert_eq!(record.monthly_returns[0], 0.0);
        assert_eq!(record.best_month, 1);
        // 나머지 11개월은 0으로 동률, 1월이 최저
        assert_eq!(record.worst_month, 0);
    }

    #[test]
    fn test_months_merge_across_years() {
        let bars = vec![
            bar(2023, 3, 1, 100.0),
            bar(2023, 3, 2, 102.0),
            bar(2024, 3, 1, 100.0),
            bar(2024, 3, 4, 96.0),
        ];
        let record = SeasonalityCalculator::new()
            .calculate("LQ45", "LQ45", &bars)
            .unwrap();

        // 2023-03-02: +2%, 2024-03-01: 102→100 (-1.96%), 2024-03-04: -4%
        let expected = round_to((0.02 + (100.0 - 102.0) / 102.0 - 0.04) / 3.0 * 100.0, 2);
        assert_eq!(record.monthly_returns[2], expected);
        assert_eq!(record.worst_month, 2);
    }

    #[test]
    fn test_zero_previous_close_is_skipped() {
        let bars = vec![
            bar(2024, 5, 1, 0.0),
            bar(2024, 5, 2, 10.0),
            bar(2024, 5, 3, 11.0),
        ];
        let record = SeasonalityCalculator::new().calculate("X", "X", &bars).unwrap();
        assert_eq!(record.monthly_returns[4], 10.0);
    }

    #[test]
    fn test_volatility_is_population_std_dev() {
        let bars = vec![bar(2024, 1, 1, 100.0), bar(2024, 1, 2, 112.0)];
        let record = SeasonalityCalculator::new().calculate("X", "X", &bars).unwrap();

        // 12개 값 중 하나만 12.0
        let avg = 1.0;
        let variance = ((12.0f64 - avg).powi(2) + 11.0 * avg * avg) / 12.0;
        assert_eq!(record.volatility, round_to(variance.sqrt(), 2));
    }

    #[test]
    fn test_too_few_bars() {
        let err = SeasonalityCalculator::new()
            .calculate("X", "X", &[bar(2024, 1, 1, 1.0)])
            .unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientData {
                required: 2,
                provided: 1
            }
        );
    }

    #[test]
    fn test_first_extreme_ties() {
        let values = [1.0, 3.0, 3.0, -2.0, -2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(first_extreme(&values, |a, b| a > b), 1);
        assert_eq!(first_extreme(&values, |a, b| a < b), 3);
    }
}
