use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use crate::core::errors::AppResult;
use crate::domain::entities::{Mutable, Page};
use crate::repositories::Repository;
use crate::services::entities::DomainService;
use crate::transactions::Transaction;
use crate::utils::clock::{Clock, IdGenerator};

/// 입력만으로 엔티티를 만들고 고치는 범용 도메인 서비스
pub struct CrudService<E: Mutable> {
    repository: Arc<dyn Repository<E>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<E: Mutable> CrudService<E> {
    pub fn new(
        repository: Arc<dyn Repository<E>>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            repository,
            clock,
            ids,
        }
    }
}

#[async_trait]
impl<E: Mutable> DomainService<E> for CrudService<E> {
    async fn create(&self, tx: &mut dyn Transaction, input: E::Create) -> AppResult<E> {
        input.validate()?;

        let entity = E::build(input, self.ids.new_id(), self.clock.now());
        self.repository.create(tx, &entity).await?;
        Ok(entity)
    }

    async fn update(&self, tx: &mut dyn Transaction, id: &str, changes: E::Update) -> AppResult<E> {
        changes.validate()?;

        let mut entity = self.repository.get_in_tx(&mut *tx, id).await?;
        entity.apply(changes, self.clock.now());
        self.repository.update(tx, &entity).await?;
        Ok(entity)
    }

    async fn delete(&self, tx: &mut dyn Transaction, id: &str) -> AppResult<()> {
        self.repository.delete(tx, id).await
    }

    async fn get(&self, id: &str) -> AppResult<E> {
        self.repository.get(id).await
    }

    async fn list(&self, filter: &E::Filter, page: Page) -> AppResult<(Vec<E>, u64)> {
        let items = self.repository.list(filter, page).await?;
        let total = self.repository.count(filter).await?;
        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::core::errors::AppError;
    use crate::domain::entities::tags::{NewTag, Tag, TagChanges, TagFilter};
    use crate::test_support::{epoch, FixedClock, MemoryRepository, RecordingTx, SequentialIds};

    fn service() -> (CrudService<Tag>, Arc<MemoryRepository<Tag>>, Arc<FixedClock>) {
        let repository = Arc::new(MemoryRepository::new());
        let clock = Arc::new(FixedClock::new(epoch()));
        let service = CrudService::new(
            repository.clone(),
            clock.clone(),
            Arc::new(SequentialIds::new("tag")),
        );
        (service, repository, clock)
    }

    #[actix_web::test]
    async fn test_create_assigns_id_and_timestamps() {
        let (service, repository, _) = service();
        let mut tx = RecordingTx::open();

        let tag = service
            .create(&mut tx, NewTag { name: "film".to_string() })
            .await
            .unwrap();

        assert_eq!(tag.id, "tag-1");
        assert_eq!(tag.created_at, epoch());
        assert_eq!(repository.snapshot("tag-1"), Some(tag));
    }

    #[actix_web::test]
    async fn test_create_rejects_invalid_input() {
        let (service, repository, _) = service();
        let mut tx = RecordingTx::open();

        let result = service.create(&mut tx, NewTag { name: String::new() }).await;

        match result {
            Err(AppError::InvalidForm(fields)) => assert!(!fields.codes("name").is_empty()),
            other => panic!("Expected InvalidForm, got {:?}", other),
        }
        assert_eq!(repository.len(), 0);
    }

    #[actix_web::test]
    async fn test_update_applies_changes() {
        let (service, _, clock) = service();
        let mut tx = RecordingTx::open();
        service
            .create(&mut tx, NewTag { name: "film".to_string() })
            .await
            .unwrap();

        clock.advance(Duration::hours(1));
        let updated = service
            .update(
                &mut tx,
                "tag-1",
                TagChanges {
                    name: Some("analog".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "analog");
        assert_eq!(updated.updated_at, epoch() + Duration::hours(1));
        assert_eq!(updated.created_at, epoch());
    }

    #[actix_web::test]
    async fn test_update_missing_is_not_found() {
        let (service, _, _) = service();
        let mut tx = RecordingTx::open();

        let result = service.update(&mut tx, "nope", TagChanges::default()).await;
        assert_eq!(result.unwrap_err(), AppError::not_found("tag", "nope"));
    }

    #[actix_web::test]
    async fn test_list_returns_page_and_total() {
        let (service, _, _) = service();
        let mut tx = RecordingTx::open();
        for name in ["a", "b", "c"] {
            service
                .create(&mut tx, NewTag { name: name.to_string() })
                .await
                .unwrap();
        }

        let (items, total) = service
            .list(&TagFilter::default(), Page { limit: 2, offset: 0 })
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(total, 3);
    }
}
