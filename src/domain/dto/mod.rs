//! HTTP 전송 계층 DTO

pub mod auth;
pub mod response;

pub use auth::request::{LocalLoginRequest, RefreshTokenRequest};
pub use response::{ListResponse, PrincipalResponse, TokenResponse};
