//! 미들웨어 모듈
//!
//! # 제공 미들웨어
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - Bearer 토큰 추출 및 `TokenService::auth`로 주체 해석
//! - 주체를 request extension에 저장 (`Principal` extractor로 꺼냄)
//! - 필수/선택 인증 모드
//!
//! ## 특정 스코프에만 적용
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! App::new()
//!     .service(
//!         web::scope("/api/v1/equipment")
//!             .wrap(AuthMiddleware::optional()) // 토큰이 없으면 guest
//!             .route("", web::get().to(list::<Equipment>))
//!     )
//! ```

mod auth_inner;
pub mod auth_middleware;

pub use auth_inner::Authenticator;
pub use auth_middleware::{AuthMiddleware, AuthMode};
