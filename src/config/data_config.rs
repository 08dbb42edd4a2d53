//! # 인프라 설정
//!
//! 실행 환경, 비밀번호 해싱, HTTP 서버, MongoDB, Redis, 아웃박스 릴레이,
//! 요청 속도 제한 설정을 환경 변수에서 읽습니다. 모든 값에는 기본값이 있으며,
//! 파싱할 수 없는 값은 경고 없이 기본값으로 대체됩니다.
//!
//! | 변수 | 기본값 |
//! |------|--------|
//! | `ENVIRONMENT` | production |
//! | `HOST` / `PORT` | 127.0.0.1 / 8080 |
//! | `BCRYPT_COST` | 환경별 (4/4/10/12) |
//! | `MONGODB_URI` | mongodb://localhost:27017 |
//! | `DATABASE_NAME` | equipment_service_dev |
//! | `STORAGE_TIMEOUT_MS` | 1000 |
//! | `REDIS_URL` | redis://localhost:6379 |
//! | `OUTBOX_POLL_INTERVAL_MS` | 500 |
//! | `OUTBOX_BATCH_SIZE` | 100 |
//! | `EVENT_STREAM_PREFIX` | events |
//! | `RATE_LIMIT_PER_SECOND` / `RATE_LIMIT_BURST_SIZE` | 100 / 200 |

use std::env;
use std::str::FromStr;
use std::time::Duration;

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

/// 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

pub struct PasswordConfig;

impl PasswordConfig {
    /// bcrypt cost. `BCRYPT_COST`가 4..=15 범위면 그 값을, 아니면 환경별 기본값을 사용합니다.
    pub fn bcrypt_cost() -> u32 {
        if let Ok(cost_str) = env::var("BCRYPT_COST") {
            if let Ok(cost) = cost_str.parse::<u32>() {
                if (4..=15).contains(&cost) {
                    return cost;
                }
            }
        }

        Self::bcrypt_cost_for_env(&Environment::current())
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env_or("PORT", 8080)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
    }

    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }
}

pub struct StorageConfig;

impl StorageConfig {
    pub fn mongodb_uri() -> String {
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
    }

    pub fn database_name() -> String {
        env::var("DATABASE_NAME").unwrap_or_else(|_| "equipment_service_dev".to_string())
    }

    /// 저장소 호출 한 건에 허용되는 최대 시간
    pub fn query_timeout() -> Duration {
        Duration::from_millis(env_or("STORAGE_TIMEOUT_MS", 1000))
    }
}

pub struct RedisConfig;

impl RedisConfig {
    pub fn url() -> String {
        env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }
}

pub struct OutboxConfig;

impl OutboxConfig {
    pub fn poll_interval() -> Duration {
        Duration::from_millis(env_or("OUTBOX_POLL_INTERVAL_MS", 500))
    }

    /// 한 주기에 발행할 최대 레코드 수. `OUTBOX_BATCH_SIZE`는 1..=1000 범위로 잘립니다.
    ///
    /// 드라이버는 0을 "제한 없음", 음수를 "단일 배치"로 해석하므로 그대로 넘기지 않습니다.
    pub fn batch_size() -> i64 {
        Self::clamp_batch_size(env_or("OUTBOX_BATCH_SIZE", 100))
    }

    pub fn clamp_batch_size(requested: i64) -> i64 {
        requested.clamp(1, 1000)
    }

    /// Redis Stream 키 접두사. 최종 키는 `<prefix>:<resource>`
    pub fn stream_prefix() -> String {
        env::var("EVENT_STREAM_PREFIX").unwrap_or_else(|_| "events".to_string())
    }
}

#[derive(Debug)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            per_second: env_or("RATE_LIMIT_PER_SECOND", 100),
            burst_size: env_or("RATE_LIMIT_BURST_SIZE", 200),
        }
    }
}
