//! CSV 출력용 숫자 포맷 헬퍼 (`#[serde(serialize_with = ...)]`).

use serde::Serializer;

/// 소수점 2자리 고정
pub fn fixed2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{:.2}", value))
}

/// 소수점 4자리 고정
pub fn fixed4<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{:.4}", value))
}

/// 부호가 붙은 퍼센트 문자열 (`+1.23%`, `-0.50%`)
pub fn signed_percent<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_signed_percent(*value))
}

/// 부호가 붙은 퍼센트 문자열 생성.
///
/// 반올림 결과가 0이면 항상 `+0.00%`입니다 (`-0.0` 포함).
pub fn format_signed_percent(value: f64) -> String {
    let magnitude = format!("{:.2}", value.abs());
    if value.is_sign_negative() && magnitude != "0.00" {
        format!("-{}%", magnitude)
    } else {
        format!("+{}%", magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_signed_percent() {
        assert_eq!(format_signed_percent(1.234), "+1.23%");
        assert_eq!(format_signed_percent(-0.5), "-0.50%");
        assert_eq!(format_signed_percent(0.0), "+0.00%");
    }

    #[test]
    fn test_format_signed_percent_negative_zero() {
        assert_eq!(format_signed_percent(-0.0), "+0.00%");
        assert_eq!(format_signed_percent(-0.001), "+0.00%");
        assert_eq!(format_signed_percent(-0.006), "-0.01%");
    }
}
