//! # 인증/인가 설정
//!
//! JWT 서명 키와 토큰 수명, 권한 테이블 파일 경로를 다룹니다.
//! `TokenService`는 환경 변수를 직접 읽지 않고 [`TokenSettings`] 값을 받으므로
//! 테스트에서는 환경을 건드리지 않고 임의의 설정을 주입할 수 있습니다.

use std::env;
use std::fmt;

use chrono::Duration;

use crate::config::data_config::Environment;
use crate::core::errors::{AppError, AppResult};

const DEV_JWT_SECRET: &str = "equipment-service-dev-secret";

pub struct JwtConfig;

impl JwtConfig {
    /// 서명 키
    ///
    /// # Errors
    ///
    /// 운영 환경에서 `JWT_SECRET`이 비어 있으면 기동을 거부합니다.
    /// 그 외 환경에서는 경고 후 개발용 키를 사용합니다.
    pub fn secret() -> AppResult<String> {
        Self::secret_for(env::var("JWT_SECRET").ok(), &Environment::current())
    }

    fn secret_for(configured: Option<String>, environment: &Environment) -> AppResult<String> {
        match configured.filter(|s| !s.trim().is_empty()) {
            Some(secret) => Ok(secret),
            None if environment.is_production() => Err(AppError::unexpected(
                "JWT_SECRET must be set in production",
            )),
            None => {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                Ok(DEV_JWT_SECRET.to_string())
            }
        }
    }

    pub fn access_expiration_minutes() -> i64 {
        env::var("JWT_ACCESS_EXPIRATION_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .unwrap_or(15)
    }

    pub fn refresh_expiration_days() -> i64 {
        env::var("JWT_REFRESH_EXPIRATION_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .unwrap_or(7)
    }
}

/// 토큰 발급/검증에 필요한 설정 값
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_env() -> AppResult<Self> {
        Ok(Self::new(
            JwtConfig::secret()?,
            Duration::minutes(JwtConfig::access_expiration_minutes()),
            Duration::days(JwtConfig::refresh_expiration_days()),
        ))
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"***")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

pub struct PermissionConfig;

impl PermissionConfig {
    /// `{group: [permission_id, ...]}` 형식의 JSON 파일 경로.
    /// 없으면 내장 권한 테이블을 사용합니다.
    pub fn permissions_file() -> Option<String> {
        env::var("PERMISSIONS_FILE").ok().filter(|p| !p.trim().is_empty())
    }
}
