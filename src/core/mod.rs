//! # Core Framework Module
//!
//! ## 모듈 구성
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 인증/인가/커맨드 코어가 공유하는 에러 분류 체계
//! - **HTTP 통합**: Actix-Web `ResponseError`로 상태 코드 결정
//! - **ErrorContext**: 외부 라이브러리 에러를 `UnexpectedBehavior`로 변환
//!
//! ### [`registry`] - 서비스 레지스트리
//! - **ServiceLocator**: 타입별 싱글톤 인스턴스 보관
//!
//! ### [`container`] - 조립
//! - 저장소, 서비스, 유스케이스를 생성하고 레지스트리에 등록

pub mod container;
pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
