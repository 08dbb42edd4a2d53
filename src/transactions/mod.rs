//! # Unit of Work
//!
//! 하나의 저장소 트랜잭션을 감싸는 핸들과 그 생성기를 정의합니다.
//!
//! ## 상태 전이
//!
//! ```text
//!            commit() 성공
//!   Open ───────────────────▶ Committed
//!    │  \
//!    │   \ commit() 실패
//!    │    ▶ Failed
//!    │
//!    └── rollback() ────────▶ RolledBack
//! ```
//!
//! - `commit()`은 `Open`에서만 허용되며 최대 한 번 성공합니다.
//! - `rollback()`은 `Open`이 아닌 상태에서 아무 일도 하지 않습니다.
//!   그래서 커맨드는 경로와 관계없이 마지막에 항상 `rollback()`을 호출할 수 있습니다.
//! - 이 검사는 드라이버 동작에 기대지 않고 핸들 안에서 직접 수행합니다.
//!
//! 핸들은 생성한 커맨드 하나가 독점하며, 커맨드가 반환되면 함께 사라집니다.

pub mod mongo;

use async_trait::async_trait;
use mongodb::ClientSession;

use crate::core::errors::AppResult;

pub use mongo::{MongoTransaction, MongoTransactionManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Open,
    Committed,
    RolledBack,
    /// 커밋 시도가 실패한 종료 상태. 이후 롤백은 생략됩니다.
    Failed,
}

impl TxState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TxState::Open)
    }
}

#[async_trait]
pub trait Transaction: Send {
    fn state(&self) -> TxState;

    /// 저장소 호출이 이 트랜잭션 안에서 실행되도록 하부 세션을 노출합니다.
    ///
    /// 세션이 없는 구현(메모리 저장소용)은 `None`을 반환합니다.
    fn session(&mut self) -> Option<&mut ClientSession>;

    async fn commit(&mut self) -> AppResult<()>;

    async fn rollback(&mut self) -> AppResult<()>;
}

#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// 트랜잭션을 시작합니다. 시작 실패는 즉시 반환됩니다.
    async fn new_tx(&self) -> AppResult<Box<dyn Transaction>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingTx;

    #[test]
    fn test_only_open_is_not_terminal() {
        assert!(!TxState::Open.is_terminal());
        assert!(TxState::Committed.is_terminal());
        assert!(TxState::RolledBack.is_terminal());
        assert!(TxState::Failed.is_terminal());
    }

    #[actix_web::test]
    async fn test_rollback_after_commit_is_a_noop() {
        let mut tx = RecordingTx::open();

        tx.commit().await.unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(tx.state(), TxState::Committed);
    }

    #[actix_web::test]
    async fn test_commit_after_rollback_is_rejected() {
        let mut tx = RecordingTx::open();

        tx.rollback().await.unwrap();
        assert!(tx.commit().await.is_err());
        assert_eq!(tx.state(), TxState::RolledBack);

        tx.rollback().await.unwrap();
        assert_eq!(tx.state(), TxState::RolledBack);
    }

    #[actix_web::test]
    async fn test_commit_succeeds_at_most_once() {
        let mut tx = RecordingTx::open();

        tx.commit().await.unwrap();
        assert!(tx.commit().await.is_err());
        assert_eq!(tx.state(), TxState::Committed);
    }
}
