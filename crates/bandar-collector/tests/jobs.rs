//! 메모리 저장소 기반 작업 통합 테스트.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bandar_collector::modules::broker_batch::BrokerFilter;
use bandar_collector::modules::feature;
use bandar_collector::{CollectorConfig, JobLogger, JobRunner, MemoryJobLog};
use bandar_core::{codec, JobProgress, JobStatus, TriggerType};
use bandar_storage::{BlobStore, MemoryBlobStore, StorageError};
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

const TX_HEADER: &str = "Emiten,BuyerVol,BuyerValue,SellerVol,SellerValue,NetBuyVol,NetBuyValue,BuyerAvg,SellerAvg,TotalVolume,AvgPrice,TransactionCount,TotalValue\n";

/// 2024-01-01부터 하루 간격의 종가 CSV
fn daily_csv(closes: &[f64]) -> String {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut text = String::from("Date,Open,High,Low,Close,Volume\n");
    for (i, close) in closes.iter().enumerate() {
        let date = start + Duration::days(i as i64);
        text.push_str(&format!("{},{c},{c},{c},{c},1000\n", date.format("%Y-%m-%d"), c = close));
    }
    text
}

fn tx_csv(rows: &[&str]) -> String {
    let mut text = TX_HEADER.to_string();
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

async fn read_rows(store: &MemoryBlobStore, path: &str) -> Vec<codec::CsvRow> {
    let text = store.download_text(path).await.unwrap();
    codec::parse(&text)
}

/// 지정한 경로 읽기만 I/O 오류를 내는 저장소.
struct FailingStore {
    inner: MemoryBlobStore,
    failing_path: &'static str,
}

#[async_trait]
impl BlobStore for FailingStore {
    async fn list_paths(&self, prefix: &str) -> bandar_storage::Result<Vec<String>> {
        self.inner.list_paths(prefix).await
    }

    async fn download_text(&self, path: &str) -> bandar_storage::Result<String> {
        if path == self.failing_path {
            return Err(StorageError::Io(format!("read failed: {}", path)));
        }
        self.inner.download_text(path).await
    }

    async fn upload_text(
        &self,
        path: &str,
        content: &str,
        content_type: &str,
    ) -> bandar_storage::Result<()> {
        self.inner.upload_text(path, content, content_type).await
    }

    async fn exists(&self, path: &str) -> bandar_storage::Result<bool> {
        self.inner.exists(path).await
    }
}

/// 진행률 갱신을 순서대로 기록하는 작업 로그.
#[derive(Default)]
struct RecordingLog {
    progress: Mutex<Vec<u8>>,
    status: Mutex<Option<JobStatus>>,
}

#[async_trait]
impl JobLogger for RecordingLog {
    async fn create(
        &self,
        _feature_name: &str,
        _trigger_type: TriggerType,
        _triggered_by: &str,
    ) -> bandar_collector::Result<Uuid> {
        Ok(Uuid::new_v4())
    }

    async fn update(&self, _id: Uuid, progress: &JobProgress) -> bandar_collector::Result<()> {
        self.progress.lock().unwrap().push(progress.progress_percentage);
        Ok(())
    }

    async fn finish(
        &self,
        _id: Uuid,
        status: JobStatus,
        _error_message: Option<&str>,
    ) -> bandar_collector::Result<()> {
        *self.status.lock().unwrap() = Some(status);
        Ok(())
    }
}

fn runner<'a>(
    store: &'a MemoryBlobStore,
    config: &'a CollectorConfig,
    log: Arc<MemoryJobLog>,
) -> JobRunner<'a> {
    JobRunner::new(store, config, log, TriggerType::Manual)
}

#[tokio::test]
async fn test_broker_inventory_two_days() {
    let store = MemoryBlobStore::with_blobs([
        (
            "broker_transaction/broker_transaction_240102/B.csv",
            tx_csv(&[
                "E1,100,1000,40,400,60,600,10,10,140,10,3,1400",
                "E2,0,0,0,0,0,0,0,0,0,0,0,0",
            ]),
        ),
        (
            "broker_transaction/broker_transaction_240103/B.csv",
            tx_csv(&["E1,0,0,30,300,-30,-300,0,10,30,10,1,300"]),
        ),
    ]);
    let config = CollectorConfig::default();
    let log = Arc::new(MemoryJobLog::new());

    let stats = runner(&store, &config, log.clone())
        .broker_inventory(&BrokerFilter::all())
        .await
        .unwrap();
    assert_eq!(stats.files_written, 2);

    let rows = read_rows(&store, "broker_inventory/E1/B.csv").await;
    let dates: Vec<&str> = rows.iter().map(|r| r.get("Date").unwrap()).collect();
    assert_eq!(dates, vec!["240103", "240102", "240101"]);
    assert_eq!(rows[0].get("NetBuyVol"), Some("-30"));
    assert_eq!(rows[0].get("CumulativeBuyVol"), Some("100"));
    assert_eq!(rows[0].get("CumulativeSellVol"), Some("70"));
    assert_eq!(rows[0].get("CumulativeNetBuyVol"), Some("30"));
    assert_eq!(rows[2].get("CumulativeNetBuyVol"), Some("0"));

    let e2 = read_rows(&store, "broker_inventory/E2/B.csv").await;
    assert_eq!(e2.len(), 3);
    assert!(e2.iter().all(|r| r.get("CumulativeNetBuyVol") == Some("0")));

    let logs = log.list().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].feature_name, feature::BROKER_INVENTORY);
    assert_eq!(logs[0].status, JobStatus::Completed);
}

#[tokio::test]
async fn test_broker_inventory_filter() {
    let store = MemoryBlobStore::with_blobs([
        (
            "broker_transaction/broker_transaction_240102/YP.csv",
            tx_csv(&["BBCA,10,100,0,0,10,100,10,0,10,10,1,100"]),
        ),
        (
            "broker_transaction/broker_transaction_240102/CC.csv",
            tx_csv(&["BBCA,5,50,0,0,5,50,10,0,5,10,1,50"]),
        ),
    ]);
    let config = CollectorConfig::default();

    runner(&store, &config, Arc::new(MemoryJobLog::new()))
        .broker_inventory(&BrokerFilter::from_list("yp"))
        .await
        .unwrap();

    assert!(store.exists("broker_inventory/BBCA/YP.csv").await.unwrap());
    assert!(!store.exists("broker_inventory/BBCA/CC.csv").await.unwrap());
}

#[tokio::test]
async fn test_broker_inventory_isolates_failed_broker_file() {
    let store = FailingStore {
        inner: MemoryBlobStore::with_blobs([
            (
                "broker_transaction/broker_transaction_240102/YP.csv",
                tx_csv(&["BBCA,10,100,0,0,10,100,10,0,10,10,1,100"]),
            ),
            (
                "broker_transaction/broker_transaction_240102/CC.csv",
                tx_csv(&["BBCA,5,50,0,0,5,50,10,0,5,10,1,50"]),
            ),
            (
                "broker_transaction/broker_transaction_240103/YP.csv",
                tx_csv(&["BBCA,0,0,4,40,-4,-40,0,10,4,10,1,40"]),
            ),
        ]),
        failing_path: "broker_transaction/broker_transaction_240102/CC.csv",
    };
    let mut config = CollectorConfig::default();
    config.aggregator.batch_size = 1;
    let log = Arc::new(RecordingLog::default());

    let stats = JobRunner::new(&store, &config, log.clone(), TriggerType::Manual)
        .broker_inventory(&BrokerFilter::all())
        .await
        .unwrap();

    assert_eq!(stats.errors, 1);
    assert_eq!(stats.files_written, 1);
    assert!(!store.exists("broker_inventory/BBCA/CC.csv").await.unwrap());

    let rows = read_rows(&store.inner, "broker_inventory/BBCA/YP.csv").await;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get("CumulativeNetBuyVol"), Some("6"));

    // 날짜 로드 0~50%, 파일 기록 50~100%
    assert_eq!(*log.progress.lock().unwrap(), vec![25, 50, 100]);
    assert_eq!(*log.status.lock().unwrap(), Some(JobStatus::Completed));
}

#[tokio::test]
async fn test_broker_summary_groups_by_type() {
    let store = MemoryBlobStore::with_blobs([
        ("csv_input/broker_list.csv", "Code,Type\nYP,Asing\nCC,Lokal\n".to_string()),
        (
            "broker_transaction/broker_transaction_240102/YP.csv",
            tx_csv(&["BBCA,100,950000,40,380000,60,570000,9500,9500,140,9500,12,1330000"]),
        ),
        (
            "broker_transaction/broker_transaction_240102/CC.csv",
            tx_csv(&["BBCA,10,95000,50,475000,-40,-380000,9500,9500,60,9500,4,570000"]),
        ),
        (
            "broker_transaction/broker_transaction_240102/ZZ.csv",
            tx_csv(&["BBCA,5,47500,0,0,5,47500,9500,0,5,9500,1,47500"]),
        ),
    ]);
    let config = CollectorConfig::default();

    let stats = runner(&store, &config, Arc::new(MemoryJobLog::new()))
        .broker_summary()
        .await
        .unwrap();
    assert_eq!(stats.files_written, 1);

    let rows = read_rows(&store, "broker_summary_type/broker_summary_240102.csv").await;
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].get("Type"), Some("Foreign"));
    assert_eq!(rows[0].get("NBLot"), Some("60"));
    assert_eq!(rows[0].get("NSLot"), Some("0"));
    assert_eq!(rows[0].get("BrokerCount"), Some("1"));

    // 목록에 없는 ZZ는 Domestic으로 합산
    assert_eq!(rows[1].get("Type"), Some("Domestic"));
    assert_eq!(rows[1].get("BuyerVol"), Some("15"));
    assert_eq!(rows[1].get("NetBuyVol"), Some("-35"));
    assert_eq!(rows[1].get("NBLot"), Some("0"));
    assert_eq!(rows[1].get("NSLot"), Some("35"));
    assert_eq!(rows[1].get("NSVal"), Some("332500"));
    assert_eq!(rows[1].get("BrokerCount"), Some("2"));
}

#[tokio::test]
async fn test_trend_filter_outputs() {
    let store = MemoryBlobStore::with_blobs([
        ("csv_input/emiten_list.csv", "Code,Name\nAAAA,Alpha Tbk\n".to_string()),
        (
            "stock/Energy/AAAA.csv",
            daily_csv(&[10.0, 10.0, 10.0, 10.0, 12.0]),
        ),
        (
            "stock/Financials/BBBB.csv",
            daily_csv(&[14.0, 13.0, 12.0, 11.0, 10.0]),
        ),
    ]);
    let config = CollectorConfig::default();

    let stats = runner(&store, &config, Arc::new(MemoryJobLog::new()))
        .trend_filter()
        .await
        .unwrap();
    assert_eq!(stats.success, 2);
    assert_eq!(stats.files_written, 5);

    let five = read_rows(&store, "trend_output/o1-trend-5D.csv").await;
    assert_eq!(five.len(), 2);
    assert_eq!(five[0].get("Symbol"), Some("AAAA"));
    assert_eq!(five[0].get("Name"), Some("Alpha Tbk"));
    assert_eq!(five[0].get("Change%"), Some("20.00"));
    assert_eq!(five[0].get("Sector"), Some("Energy"));
    assert_eq!(five[0].get("Trend"), Some("Uptrend"));
    assert_eq!(five[1].get("Symbol"), Some("BBBB"));
    assert_eq!(five[1].get("Name"), Some("BBBB"));
    assert_eq!(five[1].get("Trend"), Some("Downtrend"));

    // 봉 5개로는 2W/1M 판정 불가
    assert!(read_rows(&store, "trend_output/o1-trend-1M.csv").await.is_empty());

    let summary = read_rows(&store, "trend_output/trend-summary.csv").await;
    let periods: Vec<&str> = summary.iter().map(|r| r.get("Period").unwrap()).collect();
    assert_eq!(periods, vec!["3D", "5D", "2W", "1M"]);
    assert_eq!(summary[1].get("Total"), Some("2"));
    assert_eq!(summary[1].get("Uptrend"), Some("1"));
    assert_eq!(summary[1].get("UptrendPct"), Some("50.00"));
    assert_eq!(summary[3].get("Total"), Some("0"));
}

#[tokio::test]
async fn test_seasonality_writes_one_row_per_index() {
    let store = MemoryBlobStore::with_blobs([
        (
            "index/COMPOSITE.csv",
            "Date,Close\n2024-01-31,100\n2024-02-29,110\n2024-03-28,99\n".to_string(),
        ),
        ("index/LQ45.csv", "Date,Close\n2024-01-31,100\n".to_string()),
    ]);
    let config = CollectorConfig::default();

    let stats = runner(&store, &config, Arc::new(MemoryJobLog::new()))
        .seasonality()
        .await
        .unwrap();
    assert_eq!(stats.success, 1);
    assert_eq!(stats.skipped, 1);

    let rows = read_rows(&store, "seasonal_output/o1-seasonal-indexes.csv").await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("Ticker"), Some("COMPOSITE"));
    assert_eq!(rows[0].get("Feb"), Some("10.00"));
    assert_eq!(rows[0].get("Mar"), Some("-10.00"));
    assert_eq!(rows[0].get("BestMonth"), Some("Feb"));
    assert_eq!(rows[0].get("WorstMonth"), Some("Mar"));
}

#[tokio::test]
async fn test_rrg_calculate_then_scan() {
    let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
    let store = MemoryBlobStore::with_blobs([
        ("index/COMPOSITE.csv", daily_csv(&closes)),
        ("stock/Financials/BBCA.csv", daily_csv(&closes)),
        (
            "rrg_output/stock/o1-rrg-ZZZZ.csv",
            "Date,RS-Ratio,RS-Momentum\n2024-01-25,101.5,102.0\n".to_string(),
        ),
    ]);
    let config = CollectorConfig::default();
    let log = Arc::new(MemoryJobLog::new());
    let runner = runner(&store, &config, log.clone());

    let stats = runner.rrg_calculate().await.unwrap();
    assert_eq!(stats.files_written, 1);

    let points = read_rows(&store, "rrg_output/stock/o1-rrg-BBCA.csv").await;
    assert_eq!(points.len(), 7);
    assert!(points.iter().all(|r| r.get("RS-Ratio") == Some("100.0000")));

    let stats = runner.rrg_scan().await.unwrap();
    assert_eq!(stats.success, 2);

    let rows = read_rows(&store, "rrg_output/o3-rrg.csv").await;
    assert_eq!(rows.len(), 2);

    // RS-Ratio 내림차순
    assert_eq!(rows[0].get("Symbol"), Some("ZZZZ"));
    assert_eq!(rows[0].get("Sector"), Some("Unknown"));
    assert_eq!(rows[0].get("Performance"), Some("+0.00%"));

    assert_eq!(rows[1].get("Symbol"), Some("BBCA"));
    assert_eq!(rows[1].get("Sector"), Some("Financials"));
    assert_eq!(rows[1].get("Performance"), Some("+4.20%"));
    assert_eq!(rows[1].get("Trend"), Some("NEUTRAL"));

    assert_eq!(log.list().await.len(), 2);
}

#[tokio::test]
async fn test_run_all_continues_after_failure() {
    let store = MemoryBlobStore::new();
    let config = CollectorConfig::default();
    let log = Arc::new(MemoryJobLog::new());

    let results = runner(&store, &config, log.clone()).run_all().await;

    let names: Vec<&str> = results.iter().map(|(name, _)| *name).collect();
    assert_eq!(
        names,
        vec![
            feature::BROKER_INVENTORY,
            feature::BROKER_SUMMARY,
            feature::TREND_FILTER,
            feature::SEASONALITY,
            feature::RRG_CALCULATE,
            feature::RRG_SCAN,
        ]
    );

    // 벤치마크가 없으면 RRG 계산만 실패
    for (name, result) in &results {
        assert_eq!(result.is_err(), *name == feature::RRG_CALCULATE, "{}", name);
    }

    let logs = log.list().await;
    assert_eq!(logs.len(), 6);
    let failed: Vec<_> = logs.iter().filter(|l| l.status == JobStatus::Failed).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].feature_name, feature::RRG_CALCULATE);
    assert!(failed[0].error_message.is_some());
}
