//! # Domain Events
//!
//! 커맨드가 만든 도메인 이벤트를 브로커까지 옮기는 경로입니다.
//!
//! ```text
//! CommandCoordinator ──send(tx, event)──▶ outbox 컬렉션 (같은 트랜잭션)
//!                                              │
//!                          OutboxRelay (주기 실행)
//!                                              ▼
//!                                   Redis Stream  <prefix>:<resource>
//! ```
//!
//! 이벤트는 변경과 같은 트랜잭션으로 기록되므로 커밋되지 않은 변경의 이벤트는
//! 절대 발행되지 않습니다. 대신 발행은 최소 한 번(at-least-once)이며,
//! 소비자는 `event_id`로 중복을 제거해야 합니다.

pub mod outbox;
pub mod redis_sink;

use async_trait::async_trait;

use crate::core::errors::AppResult;
use crate::domain::models::events::DomainEvent;
use crate::transactions::Transaction;

pub use outbox::{MongoOutbox, OutboxRecord, OutboxRelay, OutboxStore};
pub use redis_sink::RedisStreamSink;

/// 커맨드 트랜잭션 안에서 이벤트를 기록합니다.
#[async_trait]
pub trait EventProducer: Send + Sync {
    async fn send(&self, tx: &mut dyn Transaction, event: DomainEvent) -> AppResult<()>;
}

/// 커밋된 이벤트를 외부로 내보냅니다.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: &DomainEvent) -> AppResult<()>;
}
