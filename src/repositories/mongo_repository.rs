use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{ClientSession, Collection};

use crate::config::StorageConfig;
use crate::core::errors::{AppError, AppResult};
use crate::db::{with_deadline, Database};
use crate::domain::entities::{Entity, Page};
use crate::repositories::Repository;
use crate::transactions::Transaction;

/// 엔티티 하나당 컬렉션 하나를 사용하는 MongoDB 저장소
pub struct MongoRepository<E: Entity> {
    collection: Collection<E>,
    timeout: Duration,
}

impl<E: Entity> MongoRepository<E> {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.get_database().collection::<E>(E::COLLECTION),
            timeout: StorageConfig::query_timeout(),
        }
    }

    pub(crate) fn collection(&self) -> &Collection<E> {
        &self.collection
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// 트랜잭션의 하부 세션을 꺼냅니다.
pub(crate) fn session_of(tx: &mut dyn Transaction) -> AppResult<&mut ClientSession> {
    tx.session()
        .ok_or_else(|| AppError::unexpected("MongoDB 세션이 없는 트랜잭션입니다"))
}

#[async_trait]
impl<E: Entity> Repository<E> for MongoRepository<E> {
    async fn create(&self, tx: &mut dyn Transaction, entity: &E) -> AppResult<()> {
        let session = session_of(tx)?;
        with_deadline(self.timeout, self.collection.insert_one(entity).session(session)).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> AppResult<E> {
        with_deadline(self.timeout, self.collection.find_one(doc! { "_id": id }))
            .await?
            .ok_or_else(|| AppError::not_found(E::RESOURCE.as_str(), id))
    }

    async fn get_in_tx(&self, tx: &mut dyn Transaction, id: &str) -> AppResult<E> {
        let session = session_of(tx)?;
        with_deadline(
            self.timeout,
            self.collection.find_one(doc! { "_id": id }).session(session),
        )
        .await?
        .ok_or_else(|| AppError::not_found(E::RESOURCE.as_str(), id))
    }

    async fn list(&self, filter: &E::Filter, page: Page) -> AppResult<Vec<E>> {
        let query = E::filter_document(filter);
        with_deadline(self.timeout, async {
            let cursor = self
                .collection
                .find(query)
                .sort(doc! { "created_at": 1, "_id": 1 })
                .skip(page.offset)
                .limit(page.limit as i64)
                .await?;
            cursor.try_collect::<Vec<E>>().await
        })
        .await
    }

    async fn count(&self, filter: &E::Filter) -> AppResult<u64> {
        with_deadline(
            self.timeout,
            self.collection.count_documents(E::filter_document(filter)),
        )
        .await
    }

    async fn update(&self, tx: &mut dyn Transaction, entity: &E) -> AppResult<()> {
        let session = session_of(tx)?;
        let result = with_deadline(
            self.timeout,
            self.collection
                .replace_one(doc! { "_id": entity.id() }, entity)
                .session(session),
        )
        .await?;

        if result.matched_count == 0 {
            return Err(AppError::not_found(E::RESOURCE.as_str(), entity.id()));
        }
        Ok(())
    }

    async fn delete(&self, tx: &mut dyn Transaction, id: &str) -> AppResult<()> {
        let session = session_of(tx)?;
        let result = with_deadline(
            self.timeout,
            self.collection.delete_one(doc! { "_id": id }).session(session),
        )
        .await?;

        if result.deleted_count == 0 {
            return Err(AppError::not_found(E::RESOURCE.as_str(), id));
        }
        Ok(())
    }
}
