//! # Domain Layer
//!
//! ```text
//! domain/
//! ├── entities/  ← 영속 엔티티와 공통 계약 (Entity, Mutable, Owned)
//! ├── models/    ← 권한, 주체, 토큰, 도메인 이벤트 값 객체
//! └── dto/       ← HTTP 요청/응답 형태
//! ```

pub mod dto;
pub mod entities;
pub mod models;
