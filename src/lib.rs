//! 장비/게시글 서비스 백엔드
//!
//! 토큰 인증, 그룹 권한 기반 인가, 트랜잭션 단위 커맨드 실행을 제공하는 서비스입니다.
//!
//! # Features
//!
//! - **JWT 인증**: 액세스/리프레시 토큰 기반 상태 없는 인증
//! - **권한 평가**: 그룹 → 권한 테이블과 엔티티별 객체 규칙 (소유권, 본인 확인)
//! - **커맨드 코디네이터**: 변경 + 이벤트 기록 + 커밋/롤백을 하나의 트랜잭션으로
//! - **트랜잭셔널 아웃박스**: 커밋된 이벤트만 Redis Streams로 발행
//! - **MongoDB**: 엔티티 영구 저장 (레플리카 셋 필요)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ Routes / Middleware  │ ← Bearer 토큰 → Principal
//! └──────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │    EntityUseCase     │ ← 권한 → 조회 → 객체 규칙
//! └──────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │  CommandCoordinator  │ ← 트랜잭션, 이벤트, 커밋/롤백
//! └──────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │ DomainService / Repo │ ← 검증, 엔티티 변경
//! └──────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │ MongoDB (+ outbox)   │ ──▶ OutboxRelay ──▶ Redis Streams
//! └──────────────────────┘
//! ```

pub mod broker;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod events;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod transactions;
pub mod utils;

#[cfg(test)]
pub mod test_support;
