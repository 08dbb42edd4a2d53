//! 인증 요청관련 DTO
//!
//! 인증을 요청하는 사용자들의 요청 정보를 매핑합니다.
use std::fmt;

use serde::Deserialize;
use validator::Validate;

use crate::domain::models::auth::Login;
use crate::domain::models::token::Token;

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다"))]
    pub refresh_token: String,
}

impl RefreshTokenRequest {
    pub fn token(&self) -> Token {
        Token::new(self.refresh_token.as_str())
    }
}

#[derive(Deserialize, Validate)]
pub struct LocalLoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

impl fmt::Debug for LocalLoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalLoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl From<LocalLoginRequest> for Login {
    fn from(request: LocalLoginRequest) -> Self {
        Login::new(request.email, request.password)
    }
}
