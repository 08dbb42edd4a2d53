use std::sync::Arc;

use crate::core::errors::AppResult;
use crate::core::registry::Service;
use crate::domain::entities::{Entity, Page};
use crate::domain::models::auth::{Action, Principal};
use crate::services::auth::{AuthorizationGate, ObjectRef};
use crate::services::entities::{CommandCoordinator, DomainService};

/// 엔티티 하나의 외부 진입점
///
/// 모든 호출은 `권한 검사 → (대상 조회) → 객체 규칙 → 실행` 순서를 따르며,
/// 앞 단계가 실패하면 뒤 단계는 시도하지 않습니다.
///
/// 수정/삭제 시 인가용으로 읽은 엔티티와 트랜잭션 안에서 다시 읽는 엔티티 사이에
/// 삭제가 끼어들면 `EntityNotFound`가 반환됩니다.
pub struct EntityUseCase<E: Entity> {
    gate: AuthorizationGate<E>,
    service: Arc<dyn DomainService<E>>,
    coordinator: CommandCoordinator<E>,
}

impl<E: Entity> Service for EntityUseCase<E> {
    const NAME: &'static str = "entity_use_case";
}

impl<E: Entity> EntityUseCase<E> {
    pub fn new(
        gate: AuthorizationGate<E>,
        service: Arc<dyn DomainService<E>>,
        coordinator: CommandCoordinator<E>,
    ) -> Self {
        Self {
            gate,
            service,
            coordinator,
        }
    }

    pub async fn create(&self, principal: &Principal, input: E::Create) -> AppResult<E> {
        let permission = self.gate.authorize(principal, Action::Create)?;
        self.gate
            .authorize_object(principal, permission, ObjectRef::Proposed(&input))?;

        self.coordinator.create(input).await
    }

    pub async fn get(&self, principal: &Principal, id: &str) -> AppResult<E> {
        let permission = self.gate.authorize(principal, Action::Get)?;
        let entity = self.service.get(id).await?;
        self.gate
            .authorize_object(principal, permission, ObjectRef::Persisted(&entity))?;

        Ok(entity)
    }

    /// 대상 객체가 없으므로 그룹 권한만 검사합니다.
    pub async fn list(
        &self,
        principal: &Principal,
        filter: &E::Filter,
        page: Page,
    ) -> AppResult<(Vec<E>, u64)> {
        self.gate.authorize(principal, Action::List)?;
        self.service.list(filter, page).await
    }

    pub async fn update(&self, principal: &Principal, id: &str, changes: E::Update) -> AppResult<E> {
        let permission = self.gate.authorize(principal, Action::Update)?;
        let current = self.service.get(id).await?;
        self.gate
            .authorize_object(principal, permission, ObjectRef::Persisted(&current))?;

        self.coordinator.update(id, changes).await
    }

    pub async fn delete(&self, principal: &Principal, id: &str) -> AppResult<()> {
        let permission = self.gate.authorize(principal, Action::Delete)?;
        let current = self.service.get(id).await?;
        self.gate
            .authorize_object(principal, permission, ObjectRef::Persisted(&current))?;

        self.coordinator.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::AppError;
    use crate::domain::entities::equipment::{Equipment, EquipmentChanges, EquipmentFilter, NewEquipment};
    use crate::domain::entities::users::{NewUser, User};
    use crate::domain::entities::Mutable;
    use crate::services::auth::{OwnershipRule, PermissionEvaluator, PermissionTable, ADMIN_GROUP, USER_GROUP};
    use crate::services::entities::CrudService;
    use crate::test_support::{
        epoch, FixedClock, MemoryRepository, RecordingEventProducer, RecordingTransactionManager,
        SequentialIds,
    };

    struct Harness {
        use_case: EntityUseCase<Equipment>,
        evaluator: Arc<PermissionEvaluator>,
        repository: Arc<MemoryRepository<Equipment>>,
        transactions: Arc<RecordingTransactionManager>,
        events: Arc<RecordingEventProducer>,
    }

    fn harness() -> Harness {
        let evaluator = Arc::new(PermissionEvaluator::new(Arc::new(PermissionTable::default_table())));
        let repository = Arc::new(MemoryRepository::new());
        let transactions = Arc::new(RecordingTransactionManager::new());
        let events = Arc::new(RecordingEventProducer::new());
        let clock = Arc::new(FixedClock::new(epoch()));

        let service: Arc<dyn DomainService<Equipment>> = Arc::new(CrudService::new(
            repository.clone(),
            clock.clone(),
            Arc::new(SequentialIds::new("equipment")),
        ));
        let coordinator = CommandCoordinator::new(
            transactions.clone(),
            service.clone(),
            events.clone(),
            clock,
            Arc::new(SequentialIds::new("event")),
        );
        let gate = AuthorizationGate::new(evaluator.clone(), Some(Arc::new(OwnershipRule)));

        Harness {
            use_case: EntityUseCase::new(gate, service, coordinator),
            evaluator,
            repository,
            transactions,
            events,
        }
    }

    fn principal(evaluator: &PermissionEvaluator, id: &str, group: &str) -> Principal {
        let mut user = User::new(
            id.to_string(),
            NewUser {
                email: format!("{id}@x.com"),
                username: format!("{id}-name"),
                display_name: id.to_string(),
                password: "password".to_string(),
            },
            "hash".to_string(),
            epoch(),
        );
        user.group = group.to_string();
        evaluator.principal_for(&user)
    }

    fn owned_by(owner: &str) -> NewEquipment {
        NewEquipment {
            owner_id: owner.to_string(),
            name: "Tripod".to_string(),
            category: "camera".to_string(),
            description: None,
        }
    }

    #[actix_web::test]
    async fn test_guest_cannot_create_and_no_transaction_starts() {
        let h = harness();
        let guest = h.evaluator.guest();

        let result = h.use_case.create(&guest, owned_by("anonymous")).await;

        assert_eq!(
            result.unwrap_err(),
            AppError::PermissionDenied {
                permission: "equipment_create".to_string()
            }
        );
        assert_eq!(h.transactions.begun(), 0);
        assert!(h.events.events().is_empty());
    }

    #[actix_web::test]
    async fn test_user_cannot_create_on_behalf_of_others() {
        let h = harness();
        let user = principal(&h.evaluator, "U1", USER_GROUP);

        let result = h.use_case.create(&user, owned_by("U2")).await;

        assert!(matches!(result, Err(AppError::PermissionDenied { .. })));
        assert_eq!(h.transactions.begun(), 0);
        assert_eq!(h.repository.len(), 0);
    }

    #[actix_web::test]
    async fn test_owner_create_update_delete() {
        let h = harness();
        let user = principal(&h.evaluator, "U1", USER_GROUP);

        let created = h.use_case.create(&user, owned_by("U1")).await.unwrap();
        let updated = h
            .use_case
            .update(
                &user,
                &created.id,
                EquipmentChanges {
                    category: Some("lighting".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.category, "lighting");

        h.use_case.delete(&user, &created.id).await.unwrap();
        assert_eq!(h.repository.len(), 0);
        assert_eq!(h.transactions.commits(), 3);
        assert_eq!(h.events.events().len(), 3);
    }

    #[actix_web::test]
    async fn test_stranger_update_is_denied_before_any_transaction() {
        let h = harness();
        h.repository
            .insert(Equipment::build(owned_by("U1"), "E1".to_string(), epoch()));
        let stranger = principal(&h.evaluator, "U2", USER_GROUP);

        let update = h.use_case.update(&stranger, "E1", EquipmentChanges::default()).await;
        let delete = h.use_case.delete(&stranger, "E1").await;

        assert!(matches!(update, Err(AppError::PermissionDenied { .. })));
        assert!(matches!(delete, Err(AppError::PermissionDenied { .. })));
        assert_eq!(h.transactions.begun(), 0);
        assert!(h.repository.snapshot("E1").is_some());
    }

    #[actix_web::test]
    async fn test_admin_moderates_foreign_equipment() {
        let h = harness();
        h.repository
            .insert(Equipment::build(owned_by("U1"), "E1".to_string(), epoch()));
        let admin = principal(&h.evaluator, "A1", ADMIN_GROUP);

        h.use_case.delete(&admin, "E1").await.unwrap();
        assert!(h.repository.snapshot("E1").is_none());
    }

    #[actix_web::test]
    async fn test_update_of_missing_entity_is_not_found_without_transaction() {
        let h = harness();
        let user = principal(&h.evaluator, "U1", USER_GROUP);

        let result = h.use_case.update(&user, "missing", EquipmentChanges::default()).await;

        assert_eq!(result.unwrap_err(), AppError::not_found("equipment", "missing"));
        assert_eq!(h.transactions.begun(), 0);
    }

    #[actix_web::test]
    async fn test_guest_can_read() {
        let h = harness();
        h.repository
            .insert(Equipment::build(owned_by("U1"), "E1".to_string(), epoch()));
        let guest = h.evaluator.guest();

        assert_eq!(h.use_case.get(&guest, "E1").await.unwrap().id, "E1");

        let (items, total) = h
            .use_case
            .list(&guest, &EquipmentFilter::default(), Page { limit: 10, offset: 0 })
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(total, 1);
    }
}
