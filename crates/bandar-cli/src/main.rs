//! 지수 계절성 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! seasonality --index-dir ./index --output-dir ./seasonal_output
//! seasonality --index-dir ./index --list-indexes
//! ```

use std::path::PathBuf;

use bandar_cli::commands::seasonality::{list_indexes, run_seasonality, SeasonalityConfig};
use bandar_core::logging::{init_logging, LogConfig};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "seasonality")]
#[command(about = "지수별 월간 계절성 계산", long_about = None)]
#[command(version)]
struct Cli {
    /// 지수 CSV 디렉터리
    #[arg(long, default_value = "index")]
    index_dir: PathBuf,

    /// 결과 디렉터리
    #[arg(long, default_value = "seasonal_output")]
    output_dir: PathBuf,

    /// 지수 목록만 출력
    #[arg(long)]
    list_indexes: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.list_indexes {
        for name in list_indexes(&cli.index_dir).await? {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = SeasonalityConfig {
        index_dir: cli.index_dir,
        output_dir: cli.output_dir,
        show_progress: true,
    };
    let output = run_seasonality(&config).await?;
    info!("결과 파일: {}", output.display());
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(LogConfig::new(cli.log_level.clone())) {
        eprintln!("로깅 초기화 실패: {}", e);
    }

    if let Err(e) = run(cli).await {
        error!("계절성 계산 실패: {:#}", e);
        std::process::exit(1);
    }
}
