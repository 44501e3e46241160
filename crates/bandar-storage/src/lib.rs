//! 블롭 저장소 접근 및 입력 탐색.
//!
//! 이 crate는 다음을 제공합니다:
//! - `BlobStore` 트레이트 (목록/읽기/쓰기/존재 확인)
//! - 파일시스템 저장소와 메모리 저장소 구현
//! - 블롭 경로 규칙
//! - 날짜/종목/지수 탐색
//! - 타입이 있는 CSV 로더
//! - 실행 단위 섹터 캐시

pub mod blob;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod local;
pub mod memory;
pub mod paths;
pub mod sector;

pub use blob::{BlobStore, CONTENT_TYPE_CSV};
pub use discovery::StockLocation;
pub use error::{Result, StorageError};
pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;
pub use sector::{SectorCache, SectorResolver};
