//! 블롭 경로 규칙.
//!
//! 대시보드/스케줄러와 호환되도록 경로 형식을 그대로 유지해야 합니다.
//!
//! | 용도 | 경로 |
//! |------|------|
//! | 주가 | `stock/<sector>/<ticker>.csv` |
//! | 지수 | `index/<name>.csv` |
//! | 브로커 거래 | `broker_transaction/broker_transaction_<YYMMDD\|YYYYMMDD>/<broker>.csv` |
//! | 브로커 인벤토리 | `broker_inventory/<emiten>/<broker>.csv` |
//! | 브로커 유형별 요약 | `broker_summary_type/broker_summary_<date>.csv` |
//! | 추세 | `trend_output/o1-trend-<period>.csv`, `trend_output/trend-summary.csv` |
//! | 계절성 | `seasonal_output/o1-seasonal-indexes.csv` |
//! | RRG (종목별) | `rrg_output/stock/o1-rrg-<symbol>.csv` |
//! | RRG 스캐너 | `rrg_output/o3-rrg.csv` |

use bandar_core::{DateKey, TrendPeriod};

pub const STOCK_PREFIX: &str = "stock/";
pub const BROKER_TRANSACTION_PREFIX: &str = "broker_transaction/";
pub const BROKER_TRANSACTION_DIR_PREFIX: &str = "broker_transaction_";
pub const BROKER_INVENTORY_PREFIX: &str = "broker_inventory/";
pub const BROKER_SUMMARY_PREFIX: &str = "broker_summary_type/";
pub const TREND_OUTPUT_PREFIX: &str = "trend_output/";
pub const RRG_STOCK_PREFIX: &str = "rrg_output/stock/";
pub const RRG_STOCK_FILE_PREFIX: &str = "o1-rrg-";
pub const RRG_SCANNER_PATH: &str = "rrg_output/o3-rrg.csv";
pub const SEASONAL_FILE_NAME: &str = "o1-seasonal-indexes.csv";
pub const BROKER_LIST_PATH: &str = "csv_input/broker_list.csv";
pub const EMITEN_LIST_PATH: &str = "csv_input/emiten_list.csv";

/// `stock/<sector>/<ticker>.csv`
pub fn stock_path(sector: &str, ticker: &str) -> String {
    format!("{}{}/{}.csv", STOCK_PREFIX, sector, ticker)
}

/// `<index_dir>/<name>.csv` (`index_dir`가 비어 있으면 `<name>.csv`)
pub fn index_path(index_dir: &str, name: &str) -> String {
    let dir = index_dir.trim_matches('/');
    if dir.is_empty() {
        format!("{}.csv", name)
    } else {
        format!("{}/{}.csv", dir, name)
    }
}

/// `broker_transaction/broker_transaction_<date>/`
pub fn broker_transaction_dir(date: &DateKey) -> String {
    format!(
        "{}{}{}/",
        BROKER_TRANSACTION_PREFIX, BROKER_TRANSACTION_DIR_PREFIX, date
    )
}

/// `broker_transaction/broker_transaction_<date>/<broker>.csv`
pub fn broker_transaction_path(date: &DateKey, broker: &str) -> String {
    format!("{}{}.csv", broker_transaction_dir(date), broker)
}

/// `broker_inventory/<emiten>/<broker>.csv`
pub fn broker_inventory_path(emiten: &str, broker: &str) -> String {
    format!("{}{}/{}.csv", BROKER_INVENTORY_PREFIX, emiten, broker)
}

/// `broker_summary_type/broker_summary_<date>.csv`
pub fn broker_summary_path(date: &DateKey) -> String {
    format!("{}broker_summary_{}.csv", BROKER_SUMMARY_PREFIX, date)
}

/// `trend_output/o1-trend-<period>.csv`
pub fn trend_output_path(period: TrendPeriod) -> String {
    format!("{}o1-trend-{}.csv", TREND_OUTPUT_PREFIX, period.label())
}

/// `trend_output/trend-summary.csv`
pub fn trend_summary_path() -> String {
    format!("{}trend-summary.csv", TREND_OUTPUT_PREFIX)
}

/// `<output_dir>/o1-seasonal-indexes.csv`
pub fn seasonal_output_path(output_dir: &str) -> String {
    format!("{}/{}", output_dir.trim_end_matches('/'), SEASONAL_FILE_NAME)
}

/// `rrg_output/stock/o1-rrg-<symbol>.csv`
pub fn rrg_stock_path(symbol: &str) -> String {
    format!("{}{}{}.csv", RRG_STOCK_PREFIX, RRG_STOCK_FILE_PREFIX, symbol)
}

/// 경로의 마지막 세그먼트에서 `.csv`를 뗀 이름.
pub fn file_stem(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next()?;
    let stem = name.strip_suffix(".csv")?;
    (!stem.is_empty()).then_some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_bit_exact() {
        let date = DateKey::parse("240102").unwrap();
        assert_eq!(stock_path("Energy", "ADRO"), "stock/Energy/ADRO.csv");
        assert_eq!(
            broker_transaction_path(&date, "YP"),
            "broker_transaction/broker_transaction_240102/YP.csv"
        );
        assert_eq!(broker_inventory_path("BBCA", "YP"), "broker_inventory/BBCA/YP.csv");
        assert_eq!(trend_output_path(TrendPeriod::W2), "trend_output/o1-trend-2W.csv");
        assert_eq!(trend_summary_path(), "trend_output/trend-summary.csv");
        assert_eq!(
            seasonal_output_path("seasonal_output/"),
            "seasonal_output/o1-seasonal-indexes.csv"
        );
        assert_eq!(rrg_stock_path("BBCA"), "rrg_output/stock/o1-rrg-BBCA.csv");
        assert_eq!(index_path("index", "COMPOSITE"), "index/COMPOSITE.csv");
        assert_eq!(index_path("", "LQ45"), "LQ45.csv");
        assert_eq!(
            broker_summary_path(&date),
            "broker_summary_type/broker_summary_240102.csv"
        );
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("stock/Energy/ADRO.csv"), Some("ADRO"));
        assert_eq!(file_stem("x/readme.txt"), None);
        assert_eq!(file_stem("x/.csv"), None);
    }
}
