//! 작업 실행기.
//!
//! 저장소, 설정, 작업 로그를 묶어 각 집계 작업을 스케줄러 로그와 함께 실행합니다.

use std::sync::Arc;

use bandar_core::TriggerType;
use bandar_storage::BlobStore;
use tracing::{error, info};

use crate::modules::broker_batch::BrokerFilter;
use crate::modules::{self, feature};
use crate::{run_job, CollectorConfig, JobLogger, JobStats, Result};

/// 작업 실행기
pub struct JobRunner<'a> {
    store: &'a dyn BlobStore,
    config: &'a CollectorConfig,
    logger: Arc<dyn JobLogger>,
    trigger: TriggerType,
}

impl<'a> JobRunner<'a> {
    pub fn new(
        store: &'a dyn BlobStore,
        config: &'a CollectorConfig,
        logger: Arc<dyn JobLogger>,
        trigger: TriggerType,
    ) -> Self {
        Self {
            store,
            config,
            logger,
            trigger,
        }
    }

    fn triggered_by(&self) -> &str {
        &self.config.scheduler.triggered_by
    }

    pub async fn broker_inventory(&self, filter: &BrokerFilter) -> Result<JobStats> {
        let (store, config) = (self.store, self.config);
        run_job(
            self.logger.clone(),
            feature::BROKER_INVENTORY,
            self.trigger,
            self.triggered_by(),
            |progress| async move {
                modules::aggregate_broker_inventory(store, config, &progress, filter).await
            },
        )
        .await
    }

    pub async fn broker_summary(&self) -> Result<JobStats> {
        let (store, config) = (self.store, self.config);
        run_job(
            self.logger.clone(),
            feature::BROKER_SUMMARY,
            self.trigger,
            self.triggered_by(),
            |progress| async move { modules::aggregate_broker_summary(store, config, &progress).await },
        )
        .await
    }

    pub async fn trend_filter(&self) -> Result<JobStats> {
        let (store, config) = (self.store, self.config);
        run_job(
            self.logger.clone(),
            feature::TREND_FILTER,
            self.trigger,
            self.triggered_by(),
            |progress| async move { modules::aggregate_trends(store, config, &progress).await },
        )
        .await
    }

    pub async fn seasonality(&self) -> Result<JobStats> {
        let (store, config) = (self.store, self.config);
        run_job(
            self.logger.clone(),
            feature::SEASONALITY,
            self.trigger,
            self.triggered_by(),
            |progress| async move { modules::aggregate_seasonality(store, config, &progress).await },
        )
        .await
    }

    pub async fn rrg_calculate(&self) -> Result<JobStats> {
        let (store, config) = (self.store, self.config);
        run_job(
            self.logger.clone(),
            feature::RRG_CALCULATE,
            self.trigger,
            self.triggered_by(),
            |progress| async move { modules::calculate_rrg(store, config, &progress).await },
        )
        .await
    }

    pub async fn rrg_scan(&self) -> Result<JobStats> {
        let (store, config) = (self.store, self.config);
        run_job(
            self.logger.clone(),
            feature::RRG_SCAN,
            self.trigger,
            self.triggered_by(),
            |progress| async move { modules::scan_rrg(store, config, &progress).await },
        )
        .await
    }

    /// 전체 작업 순차 실행.
    ///
    /// 한 작업이 실패해도 나머지는 계속 실행합니다. RRG 계산은 스캐너보다 먼저 실행됩니다.
    pub async fn run_all(&self) -> Vec<(&'static str, Result<JobStats>)> {
        info!("=== 전체 워크플로우 시작 ===");

        let mut results = Vec::with_capacity(6);
        results.push((
            feature::BROKER_INVENTORY,
            self.broker_inventory(&BrokerFilter::all()).await,
        ));
        results.push((feature::BROKER_SUMMARY, self.broker_summary().await));
        results.push((feature::TREND_FILTER, self.trend_filter().await));
        results.push((feature::SEASONALITY, self.seasonality().await));
        results.push((feature::RRG_CALCULATE, self.rrg_calculate().await));
        results.push((feature::RRG_SCAN, self.rrg_scan().await));

        for (name, result) in &results {
            match result {
                Ok(stats) => stats.log_summary(name),
                Err(e) => error!(feature = name, error = %e, "작업 실패"),
            }
        }

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        info!(failed, "=== 전체 워크플로우 완료 ===");
        results
    }
}
