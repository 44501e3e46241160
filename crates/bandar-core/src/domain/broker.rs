//! 브로커 거래 및 파생 레코드.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec::{parse_decimal_or_zero, parse_i64_or_zero};
use crate::types::DateKey;

/// 브로커 거래 CSV의 위치 기반 컬럼 수.
pub const BROKER_TRANSACTION_FIELDS: usize = 13;

/// 브로커 거래 CSV 헤더.
pub const BROKER_TRANSACTION_HEADER: [&str; BROKER_TRANSACTION_FIELDS] = [
    "Emiten",
    "BuyerVol",
    "BuyerValue",
    "SellerVol",
    "SellerValue",
    "NetBuyVol",
    "NetBuyValue",
    "BuyerAvg",
    "SellerAvg",
    "TotalVolume",
    "AvgPrice",
    "TransactionCount",
    "TotalValue",
];

/// (브로커, 날짜, 종목) 한 건의 거래 요약.
///
/// `broker_transaction/broker_transaction_<date>/<broker>.csv`의 한 행입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerTransaction {
    pub emiten: String,
    pub buyer_vol: i64,
    pub buyer_value: Decimal,
    pub seller_vol: i64,
    pub seller_value: Decimal,
    pub net_buy_vol: i64,
    pub net_buy_value: Decimal,
    pub buyer_avg: Decimal,
    pub seller_avg: Decimal,
    pub total_volume: i64,
    pub avg_price: Decimal,
    pub transaction_count: i64,
    pub total_value: Decimal,
}

impl BrokerTransaction {
    /// 위치 기반 필드에서 생성.
    ///
    /// 필드가 13개 미만이거나 종목 코드가 비어 있으면 `None`.
    pub fn from_fields(fields: &[String]) -> Option<Self> {
        if fields.len() < BROKER_TRANSACTION_FIELDS {
            return None;
        }

        let emiten = fields[0].trim().to_uppercase();
        if emiten.is_empty() {
            return None;
        }

        let int = |i: usize| parse_i64_or_zero(&fields[i]);
        let dec = |i: usize| parse_decimal_or_zero(&fields[i]);

        Some(Self {
            emiten,
            buyer_vol: int(1),
            buyer_value: dec(2),
            seller_vol: int(3),
            seller_value: dec(4),
            net_buy_vol: int(5),
            net_buy_value: dec(6),
            buyer_avg: dec(7),
            seller_avg: dec(8),
            total_volume: int(9),
            avg_price: dec(10),
            transaction_count: int(11),
            total_value: dec(12),
        })
    }
}

/// 브로커 인벤토리 한 행 (브로커, 종목, 날짜).
///
/// 누적 컬럼은 날짜 오름차순으로 일별 컬럼을 더한 값입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrokerInventoryRecord {
    #[serde(rename = "Date")]
    pub date: DateKey,
    #[serde(rename = "BuyVol")]
    pub buy_vol: i64,
    #[serde(rename = "SellVol")]
    pub sell_vol: i64,
    #[serde(rename = "NetBuyVol")]
    pub net_buy_vol: i64,
    #[serde(rename = "CumulativeBuyVol")]
    pub cumulative_buy_vol: i64,
    #[serde(rename = "CumulativeSellVol")]
    pub cumulative_sell_vol: i64,
    #[serde(rename = "CumulativeNetBuyVol")]
    pub cumulative_net_buy_vol: i64,
}

impl BrokerInventoryRecord {
    /// CSV 헤더
    pub const CSV_HEADER: [&'static str; 7] = [
        "Date",
        "BuyVol",
        "SellVol",
        "NetBuyVol",
        "CumulativeBuyVol",
        "CumulativeSellVol",
        "CumulativeNetBuyVol",
    ];

    /// 모든 값이 0인 기준 행
    pub fn baseline(date: DateKey) -> Self {
        Self {
            date,
            buy_vol: 0,
            sell_vol: 0,
            net_buy_vol: 0,
            cumulative_buy_vol: 0,
            cumulative_sell_vol: 0,
            cumulative_net_buy_vol: 0,
        }
    }
}

/// 브로커 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BrokerType {
    /// 외국계 (Asing)
    Foreign,
    /// 국내 (Lokal)
    Domestic,
    /// 국영 (Pemerintah/BUMN)
    Government,
}

impl BrokerType {
    /// 문자열 레이블
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Foreign => "Foreign",
            Self::Domestic => "Domestic",
            Self::Government => "Government",
        }
    }

    /// 브로커 목록 CSV의 유형 값 해석 (알 수 없으면 Domestic).
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "asing" | "foreign" | "f" => Self::Foreign,
            "pemerintah" | "government" | "bumn" | "g" => Self::Government,
            _ => Self::Domestic,
        }
    }
}

impl fmt::Display for BrokerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (날짜, 종목, 브로커 유형)별 합계.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokerTypeSummary {
    #[serde(rename = "Emiten")]
    pub emiten: String,
    #[serde(rename = "Type")]
    pub broker_type: BrokerType,
    #[serde(rename = "BuyerVol")]
    pub buyer_vol: i64,
    #[serde(rename = "BuyerValue")]
    pub buyer_value: Decimal,
    #[serde(rename = "SellerVol")]
    pub seller_vol: i64,
    #[serde(rename = "SellerValue")]
    pub seller_value: Decimal,
    #[serde(rename = "NetBuyVol")]
    pub net_buy_vol: i64,
    #[serde(rename = "NetBuyValue")]
    pub net_buy_value: Decimal,
    /// 순매수 수량 (순매도면 0)
    #[serde(rename = "NBLot")]
    pub nb_lot: i64,
    /// 순매수 금액 (순매도면 0)
    #[serde(rename = "NBVal")]
    pub nb_val: Decimal,
    /// 순매도 수량 (절대값, 순매수면 0)
    #[serde(rename = "NSLot")]
    pub ns_lot: i64,
    /// 순매도 금액 (절대값, 순매수면 0)
    #[serde(rename = "NSVal")]
    pub ns_val: Decimal,
    #[serde(rename = "BrokerCount")]
    pub broker_count: usize,
}

impl BrokerTypeSummary {
    /// CSV 헤더
    pub const CSV_HEADER: [&'static str; 13] = [
        "Emiten",
        "Type",
        "BuyerVol",
        "BuyerValue",
        "SellerVol",
        "SellerValue",
        "NetBuyVol",
        "NetBuyValue",
        "NBLot",
        "NBVal",
        "NSLot",
        "NSVal",
        "BrokerCount",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_fields() {
        let tx = BrokerTransaction::from_fields(&fields(&[
            "bbca", "100", "950000", "40", "380000", "60", "570000", "9500", "9500", "140",
            "9500", "12", "1330000",
        ]))
        .unwrap();

        assert_eq!(tx.emiten, "BBCA");
        assert_eq!(tx.buyer_vol, 100);
        assert_eq!(tx.seller_vol, 40);
        assert_eq!(tx.net_buy_value, dec!(570000));
        assert_eq!(tx.transaction_count, 12);
    }

    #[test]
    fn test_from_fields_rejects_short_or_empty() {
        assert!(BrokerTransaction::from_fields(&fields(&["BBCA", "1"])).is_none());

        let mut blank = fields(&["", "1", "1", "1", "1", "1", "1", "1", "1", "1", "1", "1", "1"]);
        assert!(BrokerTransaction::from_fields(&blank).is_none());

        blank[0] = "BBRI".to_string();
        blank[1] = "oops".to_string();
        assert_eq!(BrokerTransaction::from_fields(&blank).unwrap().buyer_vol, 0);
    }

    #[test]
    fn test_broker_type_labels() {
        assert_eq!(BrokerType::from_label("Asing"), BrokerType::Foreign);
        assert_eq!(BrokerType::from_label("BUMN"), BrokerType::Government);
        assert_eq!(BrokerType::from_label("Lokal"), BrokerType::Domestic);
        assert_eq!(BrokerType::from_label(""), BrokerType::Domestic);
    }
}
