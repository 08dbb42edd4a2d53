//! # Command Coordinator
//!
//! 변경 커맨드 하나를 하나의 트랜잭션으로 묶습니다.
//!
//! ```text
//! new_tx() ──▶ service.{create,update,delete}(tx) ──▶ events.send(tx) ──▶ commit()
//!                      │ Err                              │ Err              │ Err
//!                      └──────────────────────────────────┴──────────────────┘
//!                                                         ▼
//!                                              rollback() 후 에러 그대로 반환
//! ```
//!
//! `rollback()`은 모든 경로의 마지막에 한 번 호출됩니다. 커밋이 성공했거나
//! 실패한 뒤에는 트랜잭션 핸들 쪽에서 no-op이 됩니다.
//!
//! 이벤트는 아웃박스에 같은 트랜잭션으로 기록되므로, 커밋이 실패하면 이벤트도
//! 함께 사라집니다.

use std::sync::Arc;

use crate::core::errors::{AppResult, ErrorContext};
use crate::domain::entities::Entity;
use crate::domain::models::events::{DomainEvent, EventKind};
use crate::events::EventProducer;
use crate::services::entities::DomainService;
use crate::transactions::{Transaction, TransactionManager};
use crate::utils::clock::{Clock, IdGenerator};

pub struct CommandCoordinator<E: Entity> {
    transactions: Arc<dyn TransactionManager>,
    service: Arc<dyn DomainService<E>>,
    events: Arc<dyn EventProducer>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<E: Entity> CommandCoordinator<E> {
    pub fn new(
        transactions: Arc<dyn TransactionManager>,
        service: Arc<dyn DomainService<E>>,
        events: Arc<dyn EventProducer>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            transactions,
            service,
            events,
            clock,
            ids,
        }
    }

    pub async fn create(&self, input: E::Create) -> AppResult<E> {
        let mut tx = self.transactions.new_tx().await?;
        let result = self.create_in(tx.as_mut(), input).await;
        Self::settle(tx, result).await
    }

    pub async fn update(&self, id: &str, changes: E::Update) -> AppResult<E> {
        let mut tx = self.transactions.new_tx().await?;
        let result = self.update_in(tx.as_mut(), id, changes).await;
        Self::settle(tx, result).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let mut tx = self.transactions.new_tx().await?;
        let result = self.delete_in(tx.as_mut(), id).await;
        Self::settle(tx, result).await
    }

    async fn create_in(&self, tx: &mut dyn Transaction, input: E::Create) -> AppResult<E> {
        let entity = self.service.create(&mut *tx, input).await?;
        let event = self.event(EventKind::Created, entity.id(), Some(&entity))?;
        self.events.send(tx, event).await?;
        Ok(entity)
    }

    async fn update_in(&self, tx: &mut dyn Transaction, id: &str, changes: E::Update) -> AppResult<E> {
        let entity = self.service.update(&mut *tx, id, changes).await?;
        let event = self.event(EventKind::Updated, entity.id(), Some(&entity))?;
        self.events.send(tx, event).await?;
        Ok(entity)
    }

    async fn delete_in(&self, tx: &mut dyn Transaction, id: &str) -> AppResult<()> {
        self.service.delete(&mut *tx, id).await?;
        let event = self.event(EventKind::Deleted, id, None)?;
        self.events.send(tx, event).await
    }

    fn event(&self, kind: EventKind, entity_id: &str, entity: Option<&E>) -> AppResult<DomainEvent> {
        let snapshot = entity
            .map(|entity| serde_json::to_value(E::Response::from(entity.clone())))
            .transpose()
            .context("이벤트 스냅샷 직렬화 실패")?;

        Ok(DomainEvent {
            id: self.ids.new_id(),
            kind,
            resource: E::RESOURCE,
            entity_id: entity_id.to_string(),
            snapshot,
            occurred_at: self.clock.now(),
        })
    }

    /// 성공이면 커밋하고, 어느 경우든 마지막에 롤백을 호출합니다.
    async fn settle<T>(mut tx: Box<dyn Transaction>, result: AppResult<T>) -> AppResult<T> {
        let outcome = match result {
            Ok(value) => tx.commit().await.map(|_| value),
            Err(e) => Err(e),
        };

        // 롤백 실패는 원래 결과를 바꾸지 않는다
        if let Err(e) = tx.rollback().await {
            log::warn!("트랜잭션 롤백 실패 ({:?}): {:?}", tx.state(), e);
        }

        log::debug!("{} 커맨드 종료: {:?}", E::RESOURCE, tx.state());
        outcome
    }
}
