//! # Transactional Outbox
//!
//! `MongoOutbox`는 이벤트를 커맨드 트랜잭션 안에서 `outbox` 컬렉션에 기록하고,
//! `OutboxRelay`는 커밋된 레코드를 생성 순서대로 싱크에 발행한 뒤 발행 완료로 표시합니다.
//!
//! ## 실패 처리
//!
//! - 싱크 발행 실패: 그 배치를 멈추고 다음 주기에 같은 레코드부터 다시 시도합니다.
//!   뒤의 레코드가 앞의 레코드를 추월하지 않습니다.
//! - 발행 성공 뒤 표시 실패: 다음 주기에 같은 이벤트가 한 번 더 발행됩니다.
//!
//! ## 순서
//!
//! `sequence`는 `OutboxSequence`가 기록 시점에 부여하는 프로세스 내 단조 증가 값입니다.
//! 같은 마이크로초에 기록된 이벤트도 기록한 순서대로 발행됩니다.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, to_bson};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};
use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::core::errors::{AppResult, ErrorContext};
use crate::db::{with_deadline, Database};
use crate::domain::models::events::DomainEvent;
use crate::events::{EventProducer, EventSink};
use crate::repositories::mongo_repository::session_of;
use crate::transactions::Transaction;
use crate::utils::clock::Clock;

pub const OUTBOX_COLLECTION: &str = "outbox";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxRecord {
    /// 이벤트 ID와 같습니다.
    #[serde(rename = "_id")]
    pub id: String,
    pub event: DomainEvent,
    pub published: bool,
    /// 발행 순서 키. 발생 시각(마이크로초) 기반이며 기록 순서대로 증가합니다.
    pub sequence: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl OutboxRecord {
    pub fn pending(event: DomainEvent, sequence: i64) -> Self {
        Self {
            id: event.id.clone(),
            sequence,
            created_at: event.occurred_at,
            published: false,
            published_at: None,
            event,
        }
    }
}

/// 아웃박스 순서 키 생성기
///
/// 발생 시각을 마이크로초로 쓰되, 직전 값 이하이면 직전 값 + 1을 냅니다.
/// 시계가 뒤로 가거나 같은 시각에 여러 이벤트가 기록되어도 키는 엄격히 증가합니다.
#[derive(Debug, Default)]
pub struct OutboxSequence {
    last: AtomicI64,
}

impl OutboxSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, at: DateTime<Utc>) -> i64 {
        let candidate = at.timestamp_micros();
        let advance = |last: i64| candidate.max(last + 1);

        match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(advance(last)))
        {
            Ok(previous) | Err(previous) => advance(previous),
        }
    }
}

#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// 발행되지 않은 레코드를 `sequence` 오름차순으로 최대 `limit`개 읽습니다.
    async fn fetch_pending(&self, limit: i64) -> AppResult<Vec<OutboxRecord>>;

    async fn mark_published(&self, event_id: &str) -> AppResult<()>;
}

/// 프로세스당 하나만 만듭니다. 순서 키는 인스턴스 안에서만 단조 증가합니다.
pub struct MongoOutbox {
    collection: Collection<OutboxRecord>,
    clock: Arc<dyn Clock>,
    sequence: OutboxSequence,
    timeout: Duration,
}

impl MongoOutbox {
    pub fn new(database: &Database, clock: Arc<dyn Clock>) -> Self {
        Self {
            collection: database.get_database().collection(OUTBOX_COLLECTION),
            clock,
            sequence: OutboxSequence::new(),
            timeout: StorageConfig::query_timeout(),
        }
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let pending = IndexModel::builder()
            .keys(doc! { "published": 1, "sequence": 1 })
            .options(IndexOptions::builder().name("pending_by_sequence".to_string()).build())
            .build();

        with_deadline(self.timeout, self.collection.create_index(pending)).await?;
        log::info!("✅ outbox 인덱스 확인 완료");
        Ok(())
    }
}

#[async_trait]
impl EventProducer for MongoOutbox {
    async fn send(&self, tx: &mut dyn Transaction, event: DomainEvent) -> AppResult<()> {
        let sequence = self.sequence.next(event.occurred_at);
        let record = OutboxRecord::pending(event, sequence);
        let session = session_of(tx)?;
        with_deadline(self.timeout, self.collection.insert_one(&record).session(session)).await?;
        Ok(())
    }
}

#[async_trait]
impl OutboxStore for MongoOutbox {
    async fn fetch_pending(&self, limit: i64) -> AppResult<Vec<OutboxRecord>> {
        with_deadline(self.timeout, async {
            let cursor = self
                .collection
                .find(doc! { "published": false })
                .sort(doc! { "sequence": 1, "_id": 1 })
                .limit(limit)
                .await?;
            cursor.try_collect::<Vec<_>>().await
        })
        .await
    }

    async fn mark_published(&self, event_id: &str) -> AppResult<()> {
        let published_at = to_bson(&self.clock.now()).context("발행 시각 직렬화 실패")?;
        with_deadline(
            self.timeout,
            self.collection.update_one(
                doc! { "_id": event_id },
                doc! { "$set": { "published": true, "published_at": published_at } },
            ),
        )
        .await?;
        Ok(())
    }
}

/// 대기 중인 아웃박스 레코드를 싱크로 옮깁니다.
pub struct OutboxRelay {
    store: Arc<dyn OutboxStore>,
    sink: Arc<dyn EventSink>,
    batch_size: i64,
}

impl OutboxRelay {
    pub fn new(store: Arc<dyn OutboxStore>, sink: Arc<dyn EventSink>, batch_size: i64) -> Self {
        Self {
            store,
            sink,
            batch_size,
        }
    }

    /// 한 배치를 발행하고 발행한 개수를 반환합니다.
    ///
    /// 싱크가 실패하면 경고를 남기고 그 자리에서 멈춥니다. 싱크 실패는 에러로
    /// 반환하지 않지만, 아웃박스 저장소 자체의 실패는 그대로 반환합니다.
    pub async fn relay_pending(&self) -> AppResult<usize> {
        let pending = self.store.fetch_pending(self.batch_size).await?;
        let mut published = 0;

        for record in pending {
            if let Err(e) = self.sink.publish(&record.event).await {
                log::warn!("이벤트 {} 발행 실패, 다음 주기에 재시도: {:?}", record.id, e);
                break;
            }
            self.store.mark_published(&record.id).await?;
            published += 1;
        }

        Ok(published)
    }

    /// actix 런타임에서 주기적으로 `relay_pending`을 실행합니다.
    pub fn spawn(self: Arc<Self>, every: Duration) {
        actix_web::rt::spawn(async move {
            let mut ticker = actix_web::rt::time::interval(every);
            log::info!("📤 outbox 릴레이 시작 (주기 {}ms)", every.as_millis());

            loop {
                ticker.tick().await;
                match self.relay_pending().await {
                    Ok(0) => {}
                    Ok(count) => log::debug!("outbox 이벤트 {}건 발행", count),
                    Err(e) => log::warn!("outbox 릴레이 실패: {:?}", e),
                }
            }
        });
    }
}
