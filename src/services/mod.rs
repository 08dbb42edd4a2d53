//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! # Features
//!
//! - 토큰 발급/검증/갱신과 주체 해석
//! - 그룹 권한과 엔티티별 객체 규칙에 따른 인가
//! - 트랜잭션 단위 커맨드 실행과 이벤트 기록
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::core::registry::ServiceLocator;
//! use crate::services::{auth::TokenService, entities::EntityUseCase};
//!
//! let tokens = TokenService::instance()?;
//! let equipment = EntityUseCase::<Equipment>::instance()?;
//! ```

pub mod auth;
pub mod entities;
pub mod users;
