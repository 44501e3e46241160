//! 기간별 추세 분류.
//!
//! # 계산 방식
//!
//! 등락률은 기간 일수만큼의 마지막 봉(창)으로 계산합니다.
//! 이동평균과 모멘텀은 전체 봉 수 `n` 기준입니다.
//!
//! - 단기 MA 길이: `min(5, max(1, n/3))`
//! - 장기 MA 길이: `min(기간/2, max(1, n/2))` (최소 1)
//!
//! | 신호 | +1 | -1 |
//! |------|----|----|
//! | 단기 MA vs 장기 MA | 단기 > 장기 | 단기 < 장기 |
//! | 현재가 vs 단기 MA | 현재가 > 단기 | 현재가 < 단기 |
//! | 창 등락률 | > +2% | < -2% |
//! | 모멘텀 (전체 6봉 이상) | 최근 3봉 평균 > 이전 3봉 평균 | 반대 |
//!
//! 동률 신호는 0점입니다. 합계가 2 이상이면 상승, -2 이하면 하락, 그 외는 횡보입니다.

use bandar_core::{StockBar, Trend, TrendPeriod, TrendRecord, TrendSummary};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::series::{compare_signal, mean, trailing_sma};

/// 등락률 신호 임계값 (%)
const CHANGE_THRESHOLD_PCT: f64 = 2.0;

/// 모멘텀 신호에 필요한 최소 봉 수
const MOMENTUM_MIN_BARS: usize = 6;

/// 한 종목/기간의 추세 판정 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSignal {
    pub trend: Trend,
    pub score: i32,
    /// 창 첫 종가 대비 등락률 (%)
    pub change_pct: f64,
    /// 창 마지막 종가
    pub latest_price: f64,
}

/// 추세 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendCalculator;

impl TrendCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 날짜 오름차순 봉 목록으로 기간 추세 판정.
    pub fn evaluate(&self, bars: &[StockBar], period: TrendPeriod) -> AnalyticsResult<TrendSignal> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.evaluate_closes(&closes, period.days())
    }

    /// 종가 목록으로 추세 판정.
    ///
    /// 종가가 `period_days`보다 적으면 `InsufficientData`.
    pub fn evaluate_closes(&self, closes: &[f64], period_days: usize) -> AnalyticsResult<TrendSignal> {
        if period_days == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "기간 일수는 1 이상이어야 합니다".to_string(),
            ));
        }
        if closes.len() < period_days {
            return Err(AnalyticsError::InsufficientData {
                required: period_days,
                provided: closes.len(),
            });
        }

        let n = closes.len();
        let short = (n / 3).max(1).min(5);
        let long = (n / 2).max(1).min(period_days / 2).max(1);

        let first = closes[n - period_days];
        let latest = closes[n - 1];
        let change_pct = if first == 0.0 {
            if latest > 0.0 {
                100.0
            } else {
                0.0
            }
        } else {
            (latest - first) / first * 100.0
        };

        let short_ma = trailing_sma(closes, short);
        let long_ma = trailing_sma(closes, long);

        let mut score = compare_signal(short_ma, long_ma) + compare_signal(latest, short_ma);

        if change_pct > CHANGE_THRESHOLD_PCT {
            score += 1;
        } else if change_pct < -CHANGE_THRESHOLD_PCT {
            score -= 1;
        }

        if n >= MOMENTUM_MIN_BARS {
            let recent = mean(&closes[n - 3..]);
            let previous = mean(&closes[n - 6..n - 3]);
            score += compare_signal(recent, previous);
        }

        Ok(TrendSignal {
            trend: Trend::from_score(score),
            score,
            change_pct,
            latest_price: latest,
        })
    }

    /// 기간별 추세 분포 요약.
    pub fn summarize(&self, period: TrendPeriod, records: &[TrendRecord]) -> TrendSummary {
        let count = |trend: Trend| records.iter().filter(|r| r.trend == trend).count();
        let total = records.len();
        let pct = |n: usize| {
            if total == 0 {
                0.0
            } else {
                n as f64 / total as f64 * 100.0
            }
        };

        let uptrend = count(Trend::Uptrend);
        let sideways = count(Trend::Sideways);
        let downtrend = count(Trend::Downtrend);

        TrendSummary {
            period,
            total,
            uptrend,
            sideways,
            downtrend,
            uptrend_pct: pct(uptrend),
            sideways_pct: pct(sideways),
            downtrend_pct: pct(downtrend),
        }
    }
}

/// 등락률 내림차순 정렬 (같으면 종목 코드순).
pub fn sort_by_change_desc(records: &mut [TrendRecord]) {
    records.sort_by(|a, b| {
        b.change_pct
            .total_cmp(&a.change_pct)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
}
