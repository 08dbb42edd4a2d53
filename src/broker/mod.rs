//! 메시지 브로커 계층 모듈
//!
//! Redis Streams를 이벤트 싱크로 사용합니다. 아웃박스 릴레이만 이 모듈을 호출하며,
//! 커맨드 경로는 브로커를 직접 알지 못합니다.
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;

pub use self::redis::RedisClient;
