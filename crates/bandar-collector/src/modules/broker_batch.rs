//! 날짜 배치 단위 브로커 거래 로드.
//!
//! 한 배치의 날짜는 동시에 로드하고(`join_all`), 배치 사이는 순차로 진행합니다.
//! 날짜 안에서는 브로커 파일을 `max_concurrency`만큼 동시에 읽습니다.
//! 실패한 브로커/날짜는 경고 후 레코드 0건으로 취급합니다.

use std::collections::{BTreeMap, HashSet};

use bandar_core::{BrokerTransaction, DateKey};
use bandar_storage::{discovery, loader, BlobStore};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

/// 브로커 코드 → 거래 레코드 (하루치)
pub type DayTransactions = BTreeMap<String, Vec<BrokerTransaction>>;

/// 하루치 로드 결과.
#[derive(Debug)]
pub struct DayLoad {
    pub date: DateKey,
    pub transactions: DayTransactions,
    /// 로드 실패한 브로커 파일 수 (목록 조회 실패는 1)
    pub failed: usize,
}

impl DayLoad {
    fn empty(date: DateKey) -> Self {
        Self {
            date,
            transactions: DayTransactions::new(),
            failed: 0,
        }
    }

    /// 로드된 레코드 수
    pub fn record_count(&self) -> usize {
        self.transactions.values().map(Vec::len).sum()
    }
}

/// 브로커 코드 필터 (대소문자 무시).
#[derive(Debug, Clone, Default)]
pub struct BrokerFilter {
    codes: Option<HashSet<String>>,
}

impl BrokerFilter {
    /// 모든 브로커 허용
    pub fn all() -> Self {
        Self::default()
    }

    /// 쉼표 구분 목록 (예: "YP,CC"). 비어 있으면 전체 허용.
    pub fn from_list(list: &str) -> Self {
        let codes: HashSet<String> = list
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            codes: (!codes.is_empty()).then_some(codes),
        }
    }

    pub fn allows(&self, broker: &str) -> bool {
        self.codes
            .as_ref()
            .map_or(true, |codes| codes.contains(&broker.to_uppercase()))
    }
}

/// 하루치 브로커 파일 로드.
pub async fn load_day(
    store: &dyn BlobStore,
    date: DateKey,
    filter: &BrokerFilter,
    concurrency: usize,
) -> DayLoad {
    let brokers = match discovery::list_brokers_for_date(store, &date).await {
        Ok(brokers) => brokers,
        Err(e) => {
            warn!(date = %date, error = %e, "브로커 목록 조회 실패, 건너뜀");
            return DayLoad {
                failed: 1,
                ..DayLoad::empty(date)
            };
        }
    };

    let results: Vec<_> = stream::iter(brokers.into_iter().filter(|b| filter.allows(b)))
        .map(|broker| async move {
            let result = loader::load_broker_transactions(store, &date, &broker).await;
            (broker, result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut day = DayLoad::empty(date);
    for (broker, result) in results {
        match result {
            Ok(records) => {
                day.transactions.insert(broker, records);
            }
            Err(e) => {
                warn!(date = %date, broker = %broker, error = %e, "브로커 파일 로드 실패, 건너뜀");
                day.failed += 1;
            }
        }
    }

    debug!(
        date = %date,
        brokers = day.transactions.len(),
        records = day.record_count(),
        "날짜 로드 완료"
    );
    day
}

/// 배치 하나의 날짜를 동시에 로드 (입력 순서 유지).
pub async fn load_batch(
    store: &dyn BlobStore,
    dates: &[DateKey],
    filter: &BrokerFilter,
    concurrency: usize,
) -> Vec<DayLoad> {
    join_all(
        dates
            .iter()
            .map(|date| load_day(store, *date, filter, concurrency)),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandar_storage::MemoryBlobStore;

    const ROW: &str = "BBCA,100,950000,40,380000,60,570000,9500,9500,140,9500,12,1330000\n";

    #[test]
    fn test_broker_filter() {
        assert!(BrokerFilter::all().allows("YP"));
        assert!(BrokerFilter::from_list(" ").allows("YP"));

        let filter = BrokerFilter::from_list("yp, CC");
        assert!(filter.allows("YP"));
        assert!(filter.allows("cc"));
        assert!(!filter.allows("AK"));
    }

    #[tokio::test]
    async fn test_load_batch_keeps_order_and_filters() {
        let store = MemoryBlobStore::with_blobs([
            ("broker_transaction/broker_transaction_240102/YP.csv", ROW),
            ("broker_transaction/broker_transaction_240102/AK.csv", ROW),
            ("broker_transaction/broker_transaction_240103/YP.csv", ROW),
        ]);
        let dates = vec![
            DateKey::parse("240102").unwrap(),
            DateKey::parse("240103").unwrap(),
            DateKey::parse("240104").unwrap(),
        ];

        let days = load_batch(&store, &dates, &BrokerFilter::from_list("YP"), 4).await;
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, dates[0]);
        assert_eq!(days[0].transactions.len(), 1);
        assert_eq!(days[0].record_count(), 1);
        assert_eq!(days[1].transactions["YP"][0].emiten, "BBCA");
        assert!(days[2].transactions.is_empty());
        assert_eq!(days[2].failed, 0);
    }
}
