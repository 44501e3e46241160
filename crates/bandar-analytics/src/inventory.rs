//! 브로커 인벤토리 누적 계산.
//!
//! (브로커, 종목) 쌍마다 날짜별 매수/매도 거래량을 모아 누적 시계열을 만듭니다.
//!
//! # 순서
//!
//! 누적합은 반드시 날짜 오름차순으로 계산한 뒤 출력용으로 뒤집습니다.
//! 첫 행은 첫 거래일 전날의 0 기준행입니다.

use std::collections::{BTreeMap, HashMap};
use std::mem::size_of;

use bandar_core::{BrokerInventoryRecord, BrokerTransaction, DateKey};

/// 하루치 매수/매도 거래량 (lot).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyVolume {
    pub buy: i64,
    pub sell: i64,
}

/// 인벤토리 파일 하나에 대응하는 (브로커, 종목) 쌍.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InventoryKey {
    pub broker: String,
    pub emiten: String,
}

/// 로드된 거래 레코드를 쌍/날짜별 거래량으로 접어 두는 누산기.
///
/// 원본 레코드 대신 거래량만 보관하므로 배치마다 접어 넣으면 됩니다.
#[derive(Debug, Default)]
pub struct InventoryAccumulator {
    volumes: HashMap<InventoryKey, BTreeMap<DateKey, DailyVolume>>,
}

impl InventoryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 한 브로커 파일의 레코드 반영.
    ///
    /// 같은 파일에 같은 종목이 여러 번 나오면 합산합니다.
    /// 거래량이 0인 행도 쌍을 등록합니다.
    pub fn add_transactions(
        &mut self,
        date: DateKey,
        broker: &str,
        transactions: &[BrokerTransaction],
    ) {
        for tx in transactions {
            let key = InventoryKey {
                broker: broker.to_string(),
                emiten: tx.emiten.clone(),
            };
            let day = self
                .volumes
                .entry(key)
                .or_default()
                .entry(date)
                .or_default();
            day.buy += tx.buyer_vol;
            day.sell += tx.seller_vol;
        }
    }

    /// 관측된 쌍의 수
    pub fn pair_count(&self) -> usize {
        self.volumes.len()
    }

    /// 보관 중인 데이터의 대략적인 메모리 사용량 (바이트).
    pub fn estimated_bytes(&self) -> usize {
        let entry_size = size_of::<DateKey>() + size_of::<DailyVolume>();
        self.volumes
            .iter()
            .map(|(key, days)| {
                size_of::<InventoryKey>()
                    + key.broker.capacity()
                    + key.emiten.capacity()
                    + days.len() * entry_size
            })
            .sum::<usize>()
            + self.volumes.capacity() * size_of::<usize>()
    }

    /// 여유 용량 반환
    pub fn shrink_to_fit(&mut self) {
        self.volumes.shrink_to_fit();
        tracing::debug!(pairs = self.volumes.len(), "인벤토리 누적 버퍼 축소");
    }

    /// 모든 쌍의 출력용 시계열 (쌍 정렬, 각 시계열은 날짜 내림차순).
    pub fn into_series(self, dates: &[DateKey]) -> Vec<(InventoryKey, Vec<BrokerInventoryRecord>)> {
        let mut series: Vec<_> = self
            .volumes
            .into_iter()
            .map(|(key, daily)| {
                let mut rows = build_inventory_series(dates, &daily);
                rows.reverse();
                (key, rows)
            })
            .collect();
        series.sort_by(|a, b| a.0.cmp(&b.0));
        series
    }
}

/// 한 쌍의 누적 시계열 (날짜 오름차순, 기준행 포함).
///
/// `dates`는 전체 발견 날짜이며 오름차순이어야 합니다. 해당 날짜에 데이터가 없으면
/// 거래량 0으로 채웁니다. `dates`가 비어 있으면 빈 시계열입니다.
pub fn build_inventory_series(
    dates: &[DateKey],
    daily: &BTreeMap<DateKey, DailyVolume>,
) -> Vec<BrokerInventoryRecord> {
    let Some(first) = dates.first() else {
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(dates.len() + 1);
    rows.push(BrokerInventoryRecord::baseline(first.previous_calendar_day()));

    let (mut cum_buy, mut cum_sell) = (0i64, 0i64);
    for date in dates {
        let day = daily.get(date).copied().unwrap_or_default();
        cum_buy += day.buy;
        cum_sell += day.sell;

        rows.push(BrokerInventoryRecord {
            date: *date,
            buy_vol: day.buy,
            sell_vol: day.sell,
            net_buy_vol: day.buy - day.sell,
            cumulative_buy_vol: cum_buy,
            cumulative_sell_vol: cum_sell,
            cumulative_net_buy_vol: cum_buy - cum_sell,
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn key(raw: &str) -> DateKey {
        DateKey::parse(raw).unwrap()
    }

    fn tx(emiten: &str, buy: i64, sell: i64) -> BrokerTransaction {
        BrokerTransaction {
            emiten: emiten.to_string(),
            buyer_vol: buy,
            buyer_value: Decimal::ZERO,
            seller_vol: sell,
            seller_value: Decimal::ZERO,
            net_buy_vol: buy - sell,
            net_buy_value: Decimal::ZERO,
            buyer_avg: Decimal::ZERO,
            seller_avg: Decimal::ZERO,
            total_volume: buy + sell,
            avg_price: Decimal::ZERO,
            transaction_count: 0,
            total_value: Decimal::ZERO,
        }
    }

    #[test]
    fn test_two_day_scenario() {
        let dates = vec![key("240102"), key("240103")];
        let mut acc = InventoryAccumulator::new();
        acc.add_transactions(dates[0], "B", &[tx("E1", 100, 40), tx("E2", 0, 0)]);
        acc.add_transactions(dates[1], "B", &[tx("E1", 0, 30)]);

        let series = acc.into_series(&dates);
        assert_eq!(series.len(), 2);

        let (e1_key, e1) = &series[0];
        assert_eq!(e1_key.emiten, "E1");
        assert_eq!(e1.len(), 3);

        // 출력은 내림차순
        assert_eq!(e1[0].date.to_string(), "240103");
        assert_eq!(e1[0].net_buy_vol, -30);
        assert_eq!(e1[0].cumulative_buy_vol, 100);
        assert_eq!(e1[0].cumulative_sell_vol, 70);
        assert_eq!(e1[0].cumulative_net_buy_vol, 30);

        assert_eq!(e1[1].date.to_string(), "240102");
        assert_eq!(e1[1].net_buy_vol, 60);
        assert_eq!(e1[1].cumulative_net_buy_vol, 60);

        assert_eq!(e1[2], BrokerInventoryRecord::baseline(key("240101")));

        let (_, e2) = &series[1];
        assert_eq!(e2.len(), 3);
        assert!(e2.iter().all(|r| r.cumulative_net_buy_vol == 0));
    }

    #[test]
    fn test_same_emiten_rows_are_summed() {
        let dates = vec![key("20240102")];
        let mut acc = InventoryAccumulator::new();
        acc.add_transactions(dates[0], "YP", &[tx("BBCA", 10, 1), tx("BBCA", 5, 2)]);

        let series = acc.into_series(&dates);
        let rows = &series[0].1;
        assert_eq!(rows[0].buy_vol, 15);
        assert_eq!(rows[0].sell_vol, 3);
        assert_eq!(rows[1].date.to_string(), "20240101");
    }

    #[test]
    fn test_baseline_crosses_year() {
        let dates = vec![key("20000101")];
        let rows = build_inventory_series(&dates, &BTreeMap::new());
        assert_eq!(rows[0].date.to_string(), "19991231");
        assert_eq!(rows[1].buy_vol, 0);
    }

    #[test]
    fn test_empty_dates() {
        assert!(build_inventory_series(&[], &BTreeMap::new()).is_empty());
        let acc = InventoryAccumulator::new();
        assert_eq!(acc.pair_count(), 0);
        assert!(acc.into_series(&[]).is_empty());
    }

    #[test]
    fn test_estimated_bytes_grows() {
        let mut acc = InventoryAccumulator::new();
        let empty = acc.estimated_bytes();
        acc.add_transactions(key("240102"), "YP", &[tx("BBCA", 1, 1)]);
        assert!(acc.estimated_bytes() > empty);
        acc.shrink_to_fit();
        assert_eq!(acc.pair_count(), 1);
    }

    proptest! {
        #[test]
        fn prop_cumulative_matches_daily_sums(
            volumes in prop::collection::vec((0i64..1_000_000, 0i64..1_000_000, any::<bool>()), 1..40)
        ) {
            let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let dates: Vec<DateKey> = (0..volumes.len())
                .map(|i| {
                    let d = start + chrono::Duration::days(i as i64);
                    DateKey::parse(&d.format("%Y%m%d").to_string()).unwrap()
                })
                .collect();
            let daily: BTreeMap<DateKey, DailyVolume> = dates
                .iter()
                .zip(&volumes)
                .filter(|(_, (_, _, present))| *present)
                .map(|(d, (buy, sell, _))| (*d, DailyVolume { buy: *buy, sell: *sell }))
                .collect();

            let rows = build_inventory_series(&dates, &daily);
            prop_assert_eq!(rows.len(), dates.len() + 1);
            prop_assert_eq!(rows[0].cumulative_buy_vol, 0);

            let mut buy = 0;
            let mut sell = 0;
            for row in &rows[1..] {
                buy += row.buy_vol;
                sell += row.sell_vol;
                prop_assert_eq!(row.net_buy_vol, row.buy_vol - row.sell_vol);
                prop_assert_eq!(row.cumulative_buy_vol, buy);
                prop_assert_eq!(row.cumulative_sell_vol, sell);
                prop_assert_eq!(row.cumulative_net_buy_vol, buy - sell);
            }
            for pair in rows.windows(2) {
                prop_assert!(pair[0].date < pair[1].date);
            }
        }
    }
}
