//! 스케줄러 작업 로그 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 작업 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// 실행 중
    Running,
    /// 완료
    Completed,
    /// 실패
    Failed,
    /// 취소됨 (기록용, 실행 중 작업을 중단하지 않음)
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 작업 실행 트리거.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    /// 수동 실행
    Manual,
    /// 스케줄 실행
    Scheduled,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Scheduled => "scheduled",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 진행 상황 갱신 값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProgress {
    /// 진행률 (0..=100)
    pub progress_percentage: u8,
    /// 현재 처리 중인 항목 설명
    pub current_processing: String,
}

impl JobProgress {
    /// 진행률을 0..=100으로 제한하여 생성
    pub fn new(progress_percentage: f64, current_processing: impl Into<String>) -> Self {
        Self {
            progress_percentage: progress_percentage.clamp(0.0, 100.0).round() as u8,
            current_processing: current_processing.into(),
        }
    }
}

/// 스케줄러 로그 한 건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerLog {
    pub id: Uuid,
    pub feature_name: String,
    pub trigger_type: TriggerType,
    pub status: JobStatus,
    pub progress_percentage: u8,
    pub current_processing: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub triggered_by: String,
    pub error_message: Option<String>,
}

impl SchedulerLog {
    /// 실행 중 상태의 새 로그
    pub fn start(feature_name: &str, trigger_type: TriggerType, triggered_by: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            feature_name: feature_name.to_string(),
            trigger_type,
            status: JobStatus::Running,
            progress_percentage: 0,
            current_processing: None,
            started_at: Utc::now(),
            finished_at: None,
            triggered_by: triggered_by.to_string(),
            error_message: None,
        }
    }

    /// 진행 상황 반영
    pub fn apply_progress(&mut self, progress: &JobProgress) {
        self.progress_percentage = progress.progress_percentage;
        self.current_processing = Some(progress.current_processing.clone());
    }

    /// 종료 처리. 완료 시 진행률은 100입니다.
    pub fn finish(&mut self, status: JobStatus, error_message: Option<String>) {
        self.status = status;
        self.finished_at = Some(Utc::now());
        self.error_message = error_message;
        if status == JobStatus::Completed {
            self.progress_percentage = 100;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(JobProgress::new(150.0, "x").progress_percentage, 100);
        assert_eq!(JobProgress::new(-3.0, "x").progress_percentage, 0);
        assert_eq!(JobProgress::new(49.6, "x").progress_percentage, 50);
    }

    #[test]
    fn test_log_lifecycle() {
        let mut log = SchedulerLog::start("trend_filter", TriggerType::Manual, "admin");
        assert_eq!(log.status, JobStatus::Running);

        log.apply_progress(&JobProgress::new(40.0, "BBCA"));
        assert_eq!(log.progress_percentage, 40);
        assert_eq!(log.current_processing.as_deref(), Some("BBCA"));

        log.finish(JobStatus::Completed, None);
        assert_eq!(log.status, JobStatus::Completed);
        assert_eq!(log.progress_percentage, 100);
        assert!(log.finished_at.is_some());
    }
}
