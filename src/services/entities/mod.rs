//! 엔티티 커맨드/조회 서비스 모듈
//!
//! 요청 하나가 거치는 계층은 다음과 같습니다.
//!
//! ```text
//! EntityUseCase          인가 순서 강제 (권한 → 조회 → 객체 규칙)
//!   └─ CommandCoordinator    트랜잭션 + 이벤트 + 커밋/롤백 (변경만)
//!        └─ DomainService        검증 + 엔티티 변경 + 저장소 호출
//! ```
//!
//! 조회(get/list)는 코디네이터를 거치지 않고 `DomainService`로 바로 갑니다.

pub mod coordinator;
pub mod crud_service;
pub mod domain_service;
pub mod use_case;

pub use coordinator::CommandCoordinator;
pub use crud_service::CrudService;
pub use domain_service::DomainService;
pub use use_case::EntityUseCase;
