//! 지수 계절성 CLI 도구.
//!
//! 로컬 디렉터리의 지수 CSV를 읽어 계절성 결과 파일 하나를 씁니다.

pub mod commands;
