//! 수치 시계열 보조 함수.

/// 산술 평균 (빈 입력은 0).
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 마지막 `period`개 값의 단순 이동평균.
///
/// 값이 `period`보다 적으면 있는 값만으로 계산합니다.
pub fn trailing_sma(values: &[f64], period: usize) -> f64 {
    let start = values.len().saturating_sub(period.max(1));
    mean(&values[start..])
}

/// 모표준편차.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// 부호 비교 신호 (+1 / -1 / 동률 0).
pub fn compare_signal(lhs: f64, rhs: f64) -> i32 {
    if lhs > rhs {
        1
    } else if lhs < rhs {
        -1
    } else {
        0
    }
}
