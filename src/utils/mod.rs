//! 공통 유틸리티 모듈
//!
//! # Modules
//!
//! - [`clock`] - 현재 시각과 식별자 공급원 (테스트에서 교체 가능)

pub mod clock;
