//! Authentication HTTP Handlers
//!
//! - `POST /login`: 이메일/비밀번호 → 토큰 쌍
//! - `POST /refresh`: 리프레시 토큰 → 새 토큰 쌍
//! - `GET /validate`: 액세스 토큰 검증 (204 / 401)
//! - `GET /me`: 현재 주체 (필수 인증 미들웨어 뒤)

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::core::registry::Service;
use crate::domain::dto::{LocalLoginRequest, PrincipalResponse, RefreshTokenRequest, TokenResponse};
use crate::domain::models::auth::Principal;
use crate::domain::models::token::Token;
use crate::services::auth::TokenService;

#[post("/login")]
pub async fn login(payload: web::Json<LocalLoginRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let tokens = TokenService::instance()?;
    let pair = tokens.create_token(payload.into_inner().into()).await?;

    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}

#[post("/refresh")]
pub async fn refresh(payload: web::Json<RefreshTokenRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let tokens = TokenService::instance()?;
    let pair = tokens.refresh_token(&payload.token()).await?;

    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}

/// 서명과 만료만 확인합니다. 저장소를 조회하지 않습니다.
#[get("/validate")]
pub async fn validate(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::BadToken)?;
    let token = Token::from_bearer_header(header)?;

    TokenService::instance()?.validate_token(&token)?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn me(principal: Principal) -> HttpResponse {
    HttpResponse::Ok().json(PrincipalResponse::from(&principal))
}
