//! Bandarmology 배치 집계 CLI.

use std::path::PathBuf;
use std::sync::Arc;

use bandar_collector::modules::broker_batch::BrokerFilter;
use bandar_collector::{CollectorConfig, JobLogger, JobRunner, MemoryJobLog, PgJobLog};
use bandar_core::logging::{init_logging, LogConfig};
use bandar_core::TriggerType;
use bandar_storage::LocalBlobStore;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bandar-collector")]
#[command(about = "Bandarmology Batch Aggregator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로 (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error). 설정 파일 값보다 우선합니다.
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// 브로커 인벤토리 재계산
    BrokerInventory {
        /// 특정 브로커만 처리 (쉼표로 구분, 예: "YP,CC")
        #[arg(long)]
        brokers: Option<String>,
    },

    /// 일자별 브로커 유형 요약
    BrokerSummary,

    /// 기간별 추세 필터
    TrendFilter,

    /// 지수 계절성
    Seasonality,

    /// 종목별 RRG 계산
    RrgCalculate,

    /// RRG 스캐너
    RrgScan,

    /// 전체 워크플로우 실행
    RunAll,

    /// 데몬 모드: 주기적으로 전체 워크플로우 실행
    Daemon,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = CollectorConfig::load(cli.config.as_deref())?;

    let mut log_config = LogConfig::from_section(&config.logging);
    if let Some(level) = &cli.log_level {
        log_config.level = level.clone();
    }
    init_logging(log_config)?;

    tracing::info!("Bandarmology Aggregator 시작");

    let store = LocalBlobStore::new(&config.storage.root_dir)?;
    tracing::debug!(root = %store.root().display(), "저장소 준비 완료");

    // 스케줄러 로그: DB가 없으면 메모리에만 기록
    let pg_log = match &config.scheduler.database_url {
        Some(url) => {
            let log = Arc::new(PgJobLog::connect(url).await?);
            tracing::info!("데이터베이스 연결 성공");
            Some(log)
        }
        None => {
            tracing::warn!("database_url 미설정, 스케줄러 로그를 메모리에만 기록합니다");
            None
        }
    };
    let logger: Arc<dyn JobLogger> = match &pg_log {
        Some(log) => log.clone(),
        None => Arc::new(MemoryJobLog::new()),
    };

    let trigger = if matches!(cli.command, Commands::Daemon) {
        TriggerType::Scheduled
    } else {
        TriggerType::Manual
    };
    let runner = JobRunner::new(&store, &config, logger, trigger);

    match cli.command {
        Commands::BrokerInventory { brokers } => {
            let filter = match brokers {
                Some(list) => BrokerFilter::from_list(&list),
                None => BrokerFilter::all(),
            };
            let stats = runner.broker_inventory(&filter).await?;
            stats.log_summary("브로커 인벤토리");
        }
        Commands::BrokerSummary => {
            let stats = runner.broker_summary().await?;
            stats.log_summary("브로커 유형 요약");
        }
        Commands::TrendFilter => {
            let stats = runner.trend_filter().await?;
            stats.log_summary("추세 필터");
        }
        Commands::Seasonality => {
            let stats = runner.seasonality().await?;
            stats.log_summary("지수 계절성");
        }
        Commands::RrgCalculate => {
            let stats = runner.rrg_calculate().await?;
            stats.log_summary("RRG 계산");
        }
        Commands::RrgScan => {
            let stats = runner.rrg_scan().await?;
            stats.log_summary("RRG 스캐너");
        }
        Commands::RunAll => {
            let results = runner.run_all().await;
            if let Some((feature, Err(e))) = results.into_iter().find(|(_, r)| r.is_err()) {
                return Err(format!("{} 작업 실패: {}", feature, e).into());
            }
        }
        Commands::Daemon => {
            tracing::info!(
                "=== 데몬 모드 시작 (주기: {}분) ===",
                config.scheduler.interval_minutes
            );

            let mut interval = tokio::time::interval(config.daemon_interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("종료 신호 수신, 데몬 종료 중...");
                        break;
                    }
                    _ = interval.tick() => {
                        runner.run_all().await;
                        tracing::info!(
                            "=== 워크플로우 완료, 다음 실행: {}분 후 ===",
                            config.daemon_interval().as_secs() / 60
                        );
                    }
                }
            }
        }
    }

    if let Some(log) = pg_log {
        log.close().await;
    }
    tracing::info!("Bandarmology Aggregator 종료");

    Ok(())
}
