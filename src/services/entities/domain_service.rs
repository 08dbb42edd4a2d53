use async_trait::async_trait;

use crate::core::errors::AppResult;
use crate::domain::entities::{Entity, Page};
use crate::transactions::Transaction;

/// 엔티티 하나의 도메인 로직
///
/// 변경 메서드는 호출자의 트랜잭션 안에서 저장소를 호출하며, 커밋하지 않습니다.
/// 에러는 감싸지 않고 그대로 반환합니다.
#[async_trait]
pub trait DomainService<E: Entity>: Send + Sync {
    async fn create(&self, tx: &mut dyn Transaction, input: E::Create) -> AppResult<E>;

    /// # Errors
    ///
    /// - 입력 검증 실패: `InvalidForm`
    /// - 트랜잭션 안에서 다시 읽었을 때 없음: `EntityNotFound`
    async fn update(&self, tx: &mut dyn Transaction, id: &str, changes: E::Update) -> AppResult<E>;

    async fn delete(&self, tx: &mut dyn Transaction, id: &str) -> AppResult<()>;

    async fn get(&self, id: &str) -> AppResult<E>;

    /// 페이지 항목과 필터 전체 개수
    async fn list(&self, filter: &E::Filter, page: Page) -> AppResult<(Vec<E>, u64)>;
}
