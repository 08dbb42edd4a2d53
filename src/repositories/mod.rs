//! # Repositories
//!
//! 엔티티별 CRUD 계약과 MongoDB 구현입니다.
//!
//! - 변경 호출(`create`/`update`/`delete`)은 커맨드의 트랜잭션을 받아 그 안에서 실행됩니다.
//! - 조회 호출은 트랜잭션 없이 실행됩니다. 단, 수정 전 재조회(`get_in_tx`)는
//!   트랜잭션 안에서 읽습니다.
//! - `update`/`delete`는 영향받은 문서 수로만 "사라진 엔티티"를 감지합니다.
//!   잠금이 없으므로 동시 수정은 마지막 쓰기가 이깁니다.
//! - 모든 호출은 `StorageConfig::query_timeout()` 기한 안에서 실행됩니다.

pub mod mongo_repository;
pub mod users;

use async_trait::async_trait;

use crate::core::errors::AppResult;
use crate::domain::entities::{Entity, Page};
use crate::transactions::Transaction;

pub use mongo_repository::MongoRepository;
pub use users::user_repo::PrincipalStore;

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn create(&self, tx: &mut dyn Transaction, entity: &E) -> AppResult<()>;

    /// # Errors
    ///
    /// 없으면 `EntityNotFound`
    async fn get(&self, id: &str) -> AppResult<E>;

    async fn get_in_tx(&self, tx: &mut dyn Transaction, id: &str) -> AppResult<E>;

    async fn list(&self, filter: &E::Filter, page: Page) -> AppResult<Vec<E>>;

    async fn count(&self, filter: &E::Filter) -> AppResult<u64>;

    /// 전체 문서를 교체합니다. 일치하는 문서가 없으면 `EntityNotFound`
    async fn update(&self, tx: &mut dyn Transaction, entity: &E) -> AppResult<()>;

    /// 삭제된 문서가 없으면 `EntityNotFound`
    async fn delete(&self, tx: &mut dyn Transaction, id: &str) -> AppResult<()>;
}
