//! 사용자 관리 서비스 모듈
//!
//! 가입 시 이메일 중복 검사와 bcrypt 해싱을 수행하는 사용자 전용 도메인 서비스입니다.
//! 그 밖의 조회/수정/삭제는 다른 엔티티와 같은 경로(`EntityUseCase`)를 탑니다.

pub mod user_service;

pub use user_service::UserService;
