use serde::Serialize;

use crate::domain::models::auth::Principal;
use crate::domain::models::token::TokenPair;

/// 로그인/갱신 응답
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: &'static str,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access.as_str().to_string(),
            refresh_token: pair.refresh.as_str().to_string(),
            expires_in: pair.expires_in,
            token_type: "Bearer",
        }
    }
}

/// 목록 조회 응답
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub id: String,
    pub group: String,
    pub permissions: Vec<String>,
}

impl From<&Principal> for PrincipalResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id.clone(),
            group: principal.group.clone(),
            permissions: principal.permission_names(),
        }
    }
}
