//! 월 레이블.

/// 1월부터 12월까지의 3글자 레이블 (CSV 컬럼명).
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 0부터 시작하는 월 인덱스의 레이블.
pub fn month_label(index0: usize) -> &'static str {
    MONTH_LABELS.get(index0).copied().unwrap_or("")
}
