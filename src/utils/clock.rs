//! 시간과 식별자 공급원
//!
//! 토큰 만료 판정과 엔티티 타임스탬프는 모두 주입된 `Clock`을 통해 현재 시각을
//! 얻습니다. 테스트에서는 고정 시계로 교체하여 만료를 결정적으로 재현합니다.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}

/// UUID v4 문자열을 생성합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
