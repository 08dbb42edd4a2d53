//! 인증 및 인가 서비스 모듈
//!
//! 토큰 발급/검증과 권한 평가를 담당합니다.
//!
//! # Features
//!
//! - HS256 JWT 액세스/리프레시 토큰 발급, 검증, 갱신
//! - 그룹 → 권한 테이블 기반 권한 검사
//! - 엔티티별 객체 규칙 (소유권, 본인 확인)
//! - 블로킹 풀에서 수행되는 bcrypt 해싱
//!
//! # Security
//!
//! - 계정 미존재와 비밀번호 불일치는 같은 오류, 같은 해싱 비용
//! - 토큰 검증 실패 사유는 외부로 구분되어 노출되지 않음
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{AuthorizationGate, TokenService};
//!
//! let pair = token_service.create_token(login).await?;
//! let principal = token_service.auth(&pair.access).await?;
//! let permission = gate.authorize(&principal, Action::Update)?;
//! ```

pub mod authorization_gate;
pub mod password;
pub mod permission_service;
pub mod rules;
pub mod token_service;

pub use authorization_gate::*;
pub use password::*;
pub use permission_service::*;
pub use rules::*;
pub use token_service::*;
