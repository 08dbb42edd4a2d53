//! # Token Service
//!
//! 베어러 토큰의 발급, 검증, 갱신과 토큰 → 주체 해석을 담당합니다.
//!
//! ## 토큰 형식
//!
//! HS256 JWT, 클레임은 `{sub, kind, iat, exp, jti}`입니다. 서버에는 토큰 상태가
//! 저장되지 않으므로 폐기(revocation) 경로가 없습니다. 대신 액세스 토큰의 수명을
//! 짧게(기본 15분) 유지하고, 갱신할 때마다 새 토큰 쌍을 발급합니다.
//!
//! ## 상태 전이
//!
//! ```text
//! Issued ──▶ Valid (exp 이전) ──▶ Expired / Invalid
//! ```
//!
//! 만료 판정은 벽시계가 아니라 주입된 `Clock`을 기준으로 하므로,
//! `validate_token`은 (토큰, 키, 현재 시각)만의 순수 함수입니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let pair = token_service.create_token(Login::new("u@x.com", "s3cret")).await?;
//! token_service.validate_token(&pair.access)?;
//! let principal = token_service.auth(&pair.access).await?;
//! let rotated = token_service.refresh_token(&pair.refresh).await?;
//! ```

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::TokenSettings;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::core::registry::Service;
use crate::domain::entities::users::User;
use crate::domain::models::auth::{Login, Principal};
use crate::domain::models::token::{Token, TokenClaims, TokenKind, TokenPair};
use crate::repositories::PrincipalStore;
use crate::services::auth::password::PasswordHasher;
use crate::services::auth::permission_service::PermissionEvaluator;
use crate::utils::clock::{Clock, IdGenerator};

pub struct TokenService {
    principals: Arc<dyn PrincipalStore>,
    evaluator: Arc<PermissionEvaluator>,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    settings: TokenSettings,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Service for TokenService {
    const NAME: &'static str = "token";
}

impl TokenService {
    pub fn new(
        principals: Arc<dyn PrincipalStore>,
        evaluator: Arc<PermissionEvaluator>,
        hasher: PasswordHasher,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        settings: TokenSettings,
    ) -> Self {
        let encoding_key = EncodingKey::from_secret(settings.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(settings.secret.as_bytes());

        Self {
            principals,
            evaluator,
            hasher,
            clock,
            ids,
            settings,
            encoding_key,
            decoding_key,
        }
    }

    /// 이메일/비밀번호를 확인하고 토큰 쌍을 발급합니다.
    ///
    /// # Errors
    ///
    /// 계정이 없거나 비밀번호가 틀리면 구분 없이 `InvalidCredentials`
    pub async fn create_token(&self, login: Login) -> AppResult<TokenPair> {
        let user = self
            .principals
            .find_by_email(&login.normalized_email())
            .await?;

        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = self.hasher.verify(login.secret, stored_hash).await?;

        match user {
            Some(user) if verified => self.mint(&user.id),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    /// 이미 확인된 주체에게 자격 증명 검사 없이 토큰 쌍을 발급합니다.
    pub fn create_token_by_user(&self, principal: &Principal) -> AppResult<TokenPair> {
        self.mint(&principal.id)
    }

    /// 액세스 토큰의 서명, 만료, 종류를 검사합니다. I/O가 없습니다.
    pub fn validate_token(&self, token: &Token) -> AppResult<()> {
        self.decode(token, TokenKind::Access).map(|_| ())
    }

    /// 리프레시 토큰으로 새 토큰 쌍을 발급합니다.
    ///
    /// # Errors
    ///
    /// - 검증 실패: `BadToken`
    /// - 주체가 삭제됨: `EntityNotFound`
    pub async fn refresh_token(&self, token: &Token) -> AppResult<TokenPair> {
        let claims = self.decode(token, TokenKind::Refresh)?;
        let user = self.resolve(&claims.sub).await?;
        self.mint(&user.id)
    }

    /// 액세스 토큰을 검증한 뒤 저장소에서 주체를 다시 읽습니다.
    ///
    /// 토큰은 발급 시점의 유효성만 증명하므로, 그룹/권한은 항상 최신 레코드를 따릅니다.
    pub async fn auth(&self, token: &Token) -> AppResult<Principal> {
        let claims = self.decode(token, TokenKind::Access)?;
        let user = self.resolve(&claims.sub).await?;
        Ok(self.evaluator.principal_for(&user))
    }

    async fn resolve(&self, id: &str) -> AppResult<User> {
        self.principals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", id))
    }

    fn mint(&self, subject: &str) -> AppResult<TokenPair> {
        let access = self.sign(subject, TokenKind::Access)?;
        let refresh = self.sign(subject, TokenKind::Refresh)?;

        log::debug!("토큰 발급: 주체 {}", subject);

        Ok(TokenPair {
            access,
            refresh,
            expires_in: self.settings.access_ttl.num_seconds(),
        })
    }

    fn sign(&self, subject: &str, kind: TokenKind) -> AppResult<Token> {
        let now = self.clock.now();
        let ttl = match kind {
            TokenKind::Access => self.settings.access_ttl,
            TokenKind::Refresh => self.settings.refresh_ttl,
        };

        let claims = TokenClaims {
            sub: subject.to_string(),
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: self.ids.new_id(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(Token::new)
            .context("JWT 서명 실패")
    }

    fn decode(&self, token: &Token, expected: TokenKind) -> AppResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // 만료는 주입된 시계로 직접 판정한다
        validation.validate_exp = false;

        let claims = decode::<TokenClaims>(token.as_str(), &self.decoding_key, &validation)
            .map_err(|_| AppError::BadToken)?
            .claims;

        if claims.kind != expected || claims.exp <= self.clock.now().timestamp() {
            return Err(AppError::BadToken);
        }

        Ok(claims)
    }
}
