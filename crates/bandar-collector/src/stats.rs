//! 작업 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 집계 작업 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobStats {
    /// 처리 대상 수 (날짜, 종목, 지수 등 작업별 단위)
    pub total: usize,
    /// 성공 수
    pub success: usize,
    /// 에러 수 (로드/쓰기 실패, 작업은 계속됨)
    pub errors: usize,
    /// 건너뛴 수 (데이터 부족)
    pub skipped: usize,
    /// 빈 입력 수
    pub empty: usize,
    /// 기록된 출력 파일 수
    pub files_written: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl JobStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            skipped = self.skipped,
            empty = self.empty,
            files_written = self.files_written,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "작업 완료"
        );
    }
}
