//! # 서비스 조립
//!
//! 기동 시 한 번 저장소, 서비스, 유스케이스를 만들어 `ServiceLocator`에 등록합니다.
//!
//! | 엔티티 | 도메인 서비스 | 객체 규칙 |
//! |--------|---------------|-----------|
//! | `User` | `UserService` | `SelfRule` |
//! | `Equipment` | `CrudService` | `OwnershipRule` |
//! | `Post` | `CrudService` | `OwnershipRule` |
//! | `Like` | `CrudService` | `OwnershipRule` |
//! | `Tag` | `CrudService` | 없음 (그룹 권한만) |

use std::sync::Arc;

use log::info;

use crate::broker::RedisClient;
use crate::config::{OutboxConfig, TokenSettings};
use crate::core::errors::AppResult;
use crate::core::registry::ServiceLocator;
use crate::db::Database;
use crate::domain::entities::{Entity, Equipment, Like, Mutable, Post, Tag, User};
use crate::events::{EventProducer, MongoOutbox, OutboxRelay, RedisStreamSink};
use crate::repositories::MongoRepository;
use crate::services::auth::{
    AuthorizationGate, OwnershipRule, PasswordHasher, PermissionEvaluator, PermissionRule,
    PermissionTable, SelfRule, TokenService,
};
use crate::services::entities::{CommandCoordinator, CrudService, DomainService, EntityUseCase};
use crate::services::users::UserService;
use crate::transactions::{MongoTransactionManager, TransactionManager};
use crate::utils::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};

/// 모든 유스케이스가 공유하는 협력자
struct Shared {
    evaluator: Arc<PermissionEvaluator>,
    transactions: Arc<dyn TransactionManager>,
    events: Arc<dyn EventProducer>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Shared {
    fn register<E: Entity>(
        &self,
        service: Arc<dyn DomainService<E>>,
        rule: Option<Arc<dyn PermissionRule<E>>>,
    ) {
        let coordinator = CommandCoordinator::new(
            self.transactions.clone(),
            service.clone(),
            self.events.clone(),
            self.clock.clone(),
            self.ids.clone(),
        );
        let gate = AuthorizationGate::new(self.evaluator.clone(), rule);

        ServiceLocator::register(Arc::new(EntityUseCase::new(gate, service, coordinator)));
    }

    fn crud<E: Mutable>(&self, database: &Database) -> Arc<dyn DomainService<E>> {
        Arc::new(CrudService::new(
            Arc::new(MongoRepository::<E>::new(database)),
            self.clock.clone(),
            self.ids.clone(),
        ))
    }
}

/// 서비스를 조립해 등록하고, 아직 시작하지 않은 아웃박스 릴레이를 반환합니다.
pub async fn register_services(database: &Database, redis: RedisClient) -> AppResult<Arc<OutboxRelay>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ids: Arc<dyn IdGenerator> = Arc::new(UuidGenerator);

    let table = PermissionTable::load()?;
    info!("🔐 권한 테이블 로드 완료 (그룹 {}개)", table.group_count());
    let evaluator = Arc::new(PermissionEvaluator::new(Arc::new(table)));

    let outbox = Arc::new(MongoOutbox::new(database, clock.clone()));
    outbox.create_indexes().await?;

    let users = Arc::new(MongoRepository::<User>::new(database));
    users.create_indexes().await?;

    let hasher = PasswordHasher::from_env();
    let tokens = TokenService::new(
        users.clone(),
        evaluator.clone(),
        hasher.clone(),
        clock.clone(),
        ids.clone(),
        TokenSettings::from_env()?,
    );
    ServiceLocator::register(Arc::new(tokens));
    ServiceLocator::register(evaluator.clone());

    let shared = Shared {
        evaluator,
        transactions: Arc::new(MongoTransactionManager::new(database)),
        events: outbox.clone(),
        clock: clock.clone(),
        ids: ids.clone(),
    };

    let user_service = Arc::new(UserService::new(
        users.clone(),
        users,
        hasher,
        clock,
        ids,
    ));
    shared.register::<User>(user_service, Some(Arc::new(SelfRule)));
    shared.register::<Equipment>(shared.crud(database), Some(Arc::new(OwnershipRule)));
    shared.register::<Post>(shared.crud(database), Some(Arc::new(OwnershipRule)));
    shared.register::<Like>(shared.crud(database), Some(Arc::new(OwnershipRule)));
    shared.register::<Tag>(shared.crud(database), None);

    info!("✅ 엔티티 유스케이스 5개 등록 완료");

    let sink = Arc::new(RedisStreamSink::from_env(redis));
    Ok(Arc::new(OutboxRelay::new(outbox, sink, OutboxConfig::batch_size())))
}
