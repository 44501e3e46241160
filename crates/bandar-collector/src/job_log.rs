//! 스케줄러 작업 로그.
//!
//! 각 작업 실행은 `scheduler_logs`에 한 행으로 기록됩니다.
//!
//! # 상태 흐름
//!
//! `running` → `completed` | `failed` | `cancelled`
//!
//! 진행률 갱신 실패는 경고만 남기고 작업을 계속합니다. `cancelled`는 기록용이며
//! 실행 중인 작업을 멈추지 않습니다.
//!
//! # 사용 예
//!
//! ```rust,ignore
//! let logger: Arc<dyn JobLogger> = Arc::new(MemoryJobLog::new());
//! let stats = run_job(logger, "trend-filter", TriggerType::Manual, "cli", |progress| async move {
//!     trend_filter::run(store, &config, &progress).await
//! })
//! .await?;
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use bandar_core::{JobProgress, JobStatus, SchedulerLog, TriggerType};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::CollectorError;
use crate::Result;

/// 작업 로그 저장소.
#[async_trait]
pub trait JobLogger: Send + Sync {
    /// 실행 중 상태의 로그 생성
    async fn create(
        &self,
        feature_name: &str,
        trigger_type: TriggerType,
        triggered_by: &str,
    ) -> Result<Uuid>;

    /// 진행 상황 갱신
    async fn update(&self, id: Uuid, progress: &JobProgress) -> Result<()>;

    /// 종료 상태 기록
    async fn finish(&self, id: Uuid, status: JobStatus, error_message: Option<&str>) -> Result<()>;
}

/// 메모리 작업 로그 (DB가 설정되지 않은 경우와 테스트용).
#[derive(Debug, Default)]
pub struct MemoryJobLog {
    logs: RwLock<HashMap<Uuid, SchedulerLog>>,
}

impl MemoryJobLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 로그 조회
    pub async fn get(&self, id: Uuid) -> Option<SchedulerLog> {
        self.logs.read().await.get(&id).cloned()
    }

    /// 전체 로그 (시작 시각순)
    pub async fn list(&self) -> Vec<SchedulerLog> {
        let mut logs: Vec<SchedulerLog> = self.logs.read().await.values().cloned().collect();
        logs.sort_by_key(|log| log.started_at);
        logs
    }
}

#[async_trait]
impl JobLogger for MemoryJobLog {
    async fn create(
        &self,
        feature_name: &str,
        trigger_type: TriggerType,
        triggered_by: &str,
    ) -> Result<Uuid> {
        let log = SchedulerLog::start(feature_name, trigger_type, triggered_by);
        let id = log.id;
        self.logs.write().await.insert(id, log);
        Ok(id)
    }

    async fn update(&self, id: Uuid, progress: &JobProgress) -> Result<()> {
        let mut logs = self.logs.write().await;
        let log = logs
            .get_mut(&id)
            .ok_or_else(|| CollectorError::JobLog(format!("작업 로그 없음: {}", id)))?;
        log.apply_progress(progress);
        Ok(())
    }

    async fn finish(&self, id: Uuid, status: JobStatus, error_message: Option<&str>) -> Result<()> {
        let mut logs = self.logs.write().await;
        let log = logs
            .get_mut(&id)
            .ok_or_else(|| CollectorError::JobLog(format!("작업 로그 없음: {}", id)))?;
        log.finish(status, error_message.map(str::to_string));
        Ok(())
    }
}

/// PostgreSQL 작업 로그 (`scheduler_logs` 테이블).
#[derive(Debug, Clone)]
pub struct PgJobLog {
    pool: PgPool,
}

impl PgJobLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// DB 연결
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        tracing::info!("스케줄러 로그 데이터베이스 연결 성공");
        Ok(Self::new(pool))
    }

    /// 연결 종료
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl JobLogger for PgJobLog {
    async fn create(
        &self,
        feature_name: &str,
        trigger_type: TriggerType,
        triggered_by: &str,
    ) -> Result<Uuid> {
        let log = SchedulerLog::start(feature_name, trigger_type, triggered_by);
        sqlx::query(
            r#"
            INSERT INTO scheduler_logs
                (id, feature_name, trigger_type, status, progress_percentage, started_at, triggered_by)
            VALUES ($1, $2, $3, $4, 0, $5, $6)
            "#,
        )
        .bind(log.id)
        .bind(&log.feature_name)
        .bind(log.trigger_type.as_str())
        .bind(log.status.as_str())
        .bind(log.started_at)
        .bind(&log.triggered_by)
        .execute(&self.pool)
        .await?;
        Ok(log.id)
    }

    async fn update(&self, id: Uuid, progress: &JobProgress) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduler_logs
            SET progress_percentage = $2, current_processing = $3
            WHERE id = $1 AND status = 'running'
            "#,
        )
        .bind(id)
        .bind(progress.progress_percentage as i16)
        .bind(&progress.current_processing)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn finish(&self, id: Uuid, status: JobStatus, error_message: Option<&str>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduler_logs
            SET status = $2,
                finished_at = NOW(),
                error_message = $3,
                progress_percentage = CASE WHEN $2 = 'completed' THEN 100 ELSE progress_percentage END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(error_message)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// 작업 하나의 진행률 보고기.
#[derive(Clone)]
pub struct ProgressReporter {
    logger: Arc<dyn JobLogger>,
    id: Uuid,
}

impl ProgressReporter {
    pub fn new(logger: Arc<dyn JobLogger>, id: Uuid) -> Self {
        Self { logger, id }
    }

    pub fn job_id(&self) -> Uuid {
        self.id
    }

    /// 진행률 보고 (0..=100으로 제한). 실패는 경고만 남깁니다.
    pub async fn report(&self, percentage: f64, current: impl Into<String>) {
        let progress = JobProgress::new(percentage, current);
        if let Err(e) = self.logger.update(self.id, &progress).await {
            tracing::warn!(job_id = %self.id, error = %e, "진행률 갱신 실패");
        }
    }
}

/// 작업 실행과 로그 기록.
///
/// 로그를 만들고 작업을 실행한 뒤 결과에 따라 `completed` 또는 `failed`로 종료합니다.
/// 작업 에러는 로그에 기록한 뒤 그대로 반환합니다.
pub async fn run_job<T, F, Fut>(
    logger: Arc<dyn JobLogger>,
    feature_name: &str,
    trigger_type: TriggerType,
    triggered_by: &str,
    job: F,
) -> Result<T>
where
    F: FnOnce(ProgressReporter) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let id = logger
        .create(feature_name, trigger_type, triggered_by)
        .await?;
    let span = bandar_core::job_span!(feature_name, id);

    async move {
        tracing::info!(trigger = %trigger_type, "작업 시작");

        let result = job(ProgressReporter::new(logger.clone(), id)).await;

        let (status, message) = match &result {
            Ok(_) => (JobStatus::Completed, None),
            Err(e) => (JobStatus::Failed, Some(e.to_string())),
        };
        if let Err(e) = logger.finish(id, status, message.as_deref()).await {
            tracing::warn!(error = %e, "작업 로그 종료 기록 실패");
        }

        match &result {
            Ok(_) => tracing::info!("작업 완료"),
            Err(e) => tracing::error!(error = %e, "작업 실패"),
        }
        result
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_log_lifecycle() {
        let log = MemoryJobLog::new();
        let id = log
            .create("trend-filter", TriggerType::Manual, "tester")
            .await
            .unwrap();

        log.update(id, &JobProgress::new(42.4, "3D")).await.unwrap();
        let running = log.get(id).await.unwrap();
        assert_eq!(running.status, JobStatus::Running);
        assert_eq!(running.progress_percentage, 42);
        assert_eq!(running.current_processing.as_deref(), Some("3D"));

        log.finish(id, JobStatus::Completed, None).await.unwrap();
        let done = log.get(id).await.unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.progress_percentage, 100);
        assert!(done.finished_at.is_some());
    }

    #[tokio::test]
    async fn test_update_unknown_job_is_error() {
        let log = MemoryJobLog::new();
        assert!(log
            .update(Uuid::new_v4(), &JobProgress::new(10.0, "x"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_run_job_records_failure() {
        let log = Arc::new(MemoryJobLog::new());

        let result: Result<()> = run_job(
            log.clone(),
            "rrg-scan",
            TriggerType::Scheduled,
            "system",
            |progress| async move {
                progress.report(30.0, "loading").await;
                Err(CollectorError::Config("root missing".to_string()))
            },
        )
        .await;
        assert!(result.is_err());

        let logs = log.list().await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, JobStatus::Failed);
        assert_eq!(logs[0].progress_percentage, 30);
        assert!(logs[0]
            .error_message
            .as_deref()
            .unwrap()
            .contains("root missing"));
    }

    #[tokio::test]
    async fn test_run_job_records_success() {
        let log = Arc::new(MemoryJobLog::new());
        let value = run_job(log.clone(), "seasonality", TriggerType::Manual, "cli", |_| async {
            Ok(7)
        })
        .await
        .unwrap();

        assert_eq!(value, 7);
        assert_eq!(log.list().await[0].status, JobStatus::Completed);
    }
}
