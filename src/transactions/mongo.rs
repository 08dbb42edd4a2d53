use std::time::Duration;

use async_trait::async_trait;
use mongodb::{Client, ClientSession};

use crate::config::StorageConfig;
use crate::core::errors::{AppError, AppResult};
use crate::db::{with_deadline, Database};
use crate::transactions::{Transaction, TransactionManager, TxState};

/// `ClientSession` 기반 트랜잭션 생성기
pub struct MongoTransactionManager {
    client: Client,
    timeout: Duration,
}

impl MongoTransactionManager {
    pub fn new(database: &Database) -> Self {
        Self {
            client: database.client().clone(),
            timeout: StorageConfig::query_timeout(),
        }
    }
}

#[async_trait]
impl TransactionManager for MongoTransactionManager {
    async fn new_tx(&self) -> AppResult<Box<dyn Transaction>> {
        let mut session = with_deadline(self.timeout, self.client.start_session()).await?;
        with_deadline(self.timeout, session.start_transaction()).await?;
        log::debug!("트랜잭션 시작");

        Ok(Box::new(MongoTransaction {
            session,
            state: TxState::Open,
            timeout: self.timeout,
        }))
    }
}

/// 열린 다중 문서 트랜잭션을 가진 세션
///
/// 커맨드 future가 중간에 drop되면 세션의 drop이 드라이버 쪽에서
/// 열린 트랜잭션을 abort합니다.
pub struct MongoTransaction {
    session: ClientSession,
    state: TxState,
    timeout: Duration,
}

#[async_trait]
impl Transaction for MongoTransaction {
    fn state(&self) -> TxState {
        self.state
    }

    fn session(&mut self) -> Option<&mut ClientSession> {
        Some(&mut self.session)
    }

    async fn commit(&mut self) -> AppResult<()> {
        if self.state != TxState::Open {
            return Err(AppError::unexpected(format!(
                "{:?} 상태의 트랜잭션은 커밋할 수 없습니다",
                self.state
            )));
        }

        match with_deadline(self.timeout, self.session.commit_transaction()).await {
            Ok(()) => {
                self.state = TxState::Committed;
                log::debug!("트랜잭션 커밋");
                Ok(())
            }
            Err(e) => {
                self.state = TxState::Failed;
                Err(e)
            }
        }
    }

    async fn rollback(&mut self) -> AppResult<()> {
        if self.state != TxState::Open {
            return Ok(());
        }

        let result = with_deadline(self.timeout, self.session.abort_transaction()).await;
        self.state = match &result {
            Ok(()) => TxState::RolledBack,
            Err(_) => TxState::Failed,
        };
        log::debug!("트랜잭션 롤백: {:?}", self.state);
        result
    }
}
