use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;

/// 베어러 토큰 값
///
/// 일반 문자열과 구분되는 타입이므로 이메일이나 ID를 토큰 자리에
/// 잘못 넘기는 실수를 컴파일 단계에서 막습니다.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization: Bearer <token>` 헤더 값에서 토큰을 추출합니다.
    ///
    /// # Errors
    ///
    /// 스킴이 `Bearer`가 아니거나 토큰이 비어 있으면 `BadToken`
    pub fn from_bearer_header(header: &str) -> Result<Self, AppError> {
        match header.trim().split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
                let token = token.trim();
                if token.is_empty() {
                    Err(AppError::BadToken)
                } else {
                    Ok(Token::new(token))
                }
            }
            _ => Err(AppError::BadToken),
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// 토큰 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT 클레임
///
/// - `sub`: 주체 ID
/// - `kind`: `access` | `refresh`
/// - `iat`/`exp`: 발급/만료 시각 (Unix 초)
/// - `jti`: 토큰마다 고유한 ID. 같은 초에 발급된 두 토큰도 서로 다른 값이 됨
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// 한 번의 발급 호출에서 함께 만들어지는 액세스/리프레시 토큰 쌍
///
/// 두 토큰의 `sub`는 항상 같습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: Token,
    pub refresh: Token,
    /// 액세스 토큰 유효 시간 (초)
    pub expires_in: i64,
}
