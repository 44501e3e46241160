//! 브로커 유형별 일간 요약.
//!
//! 하루치 모든 브로커 파일을 (종목, 브로커 유형)으로 묶어 합산합니다.
//! 순매수/순매도는 합산 후의 순매수 거래량/금액 부호로 나눕니다.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use bandar_core::{BrokerTransaction, BrokerType, BrokerTypeSummary};
use rust_decimal::Decimal;

#[derive(Debug, Default)]
struct TypeTotals {
    buyer_vol: i64,
    buyer_value: Decimal,
    seller_vol: i64,
    seller_value: Decimal,
    net_buy_vol: i64,
    net_buy_value: Decimal,
    brokers: BTreeSet<String>,
}

/// 하루치 브로커별 거래 레코드를 유형별로 요약.
///
/// `broker_types`에 없는 브로커는 국내(Domestic)로 봅니다.
/// 결과는 종목 코드순, 같은 종목은 Foreign, Domestic, Government 순입니다.
pub fn summarize_by_type(
    by_broker: &BTreeMap<String, Vec<BrokerTransaction>>,
    broker_types: &HashMap<String, BrokerType>,
) -> Vec<BrokerTypeSummary> {
    let mut totals: BTreeMap<(String, BrokerType), TypeTotals> = BTreeMap::new();

    for (broker, transactions) in by_broker {
        let broker_type = broker_types
            .get(&broker.to_uppercase())
            .copied()
            .unwrap_or(BrokerType::Domestic);

        for tx in transactions {
            let entry = totals
                .entry((tx.emiten.clone(), broker_type))
                .or_default();
            entry.buyer_vol += tx.buyer_vol;
            entry.buyer_value += tx.buyer_value;
            entry.seller_vol += tx.seller_vol;
            entry.seller_value += tx.seller_value;
            entry.net_buy_vol += tx.net_buy_vol;
            entry.net_buy_value += tx.net_buy_value;
            entry.brokers.insert(broker.clone());
        }
    }

    totals
        .into_iter()
        .map(|((emiten, broker_type), t)| BrokerTypeSummary {
            emiten,
            broker_type,
            buyer_vol: t.buyer_vol,
            buyer_value: t.buyer_value,
            seller_vol: t.seller_vol,
            seller_value: t.seller_value,
            net_buy_vol: t.net_buy_vol,
            net_buy_value: t.net_buy_value,
            nb_lot: t.net_buy_vol.max(0),
            nb_val: t.net_buy_value.max(Decimal::ZERO),
            ns_lot: (-t.net_buy_vol).max(0),
            ns_val: (-t.net_buy_value).max(Decimal::ZERO),
            broker_count: t.brokers.len(),
        })
        .collect()
}
