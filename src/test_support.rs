//! 테스트 더블
//!
//! 외부 협력자(시계, ID 생성기, 저장소, 트랜잭션, 이벤트 생산자)를 메모리 구현으로
//! 대체합니다. 트랜잭션 더블은 커밋/롤백 호출 횟수를 기록하므로 커맨드 코디네이터의
//! 순서 보장을 직접 검증할 수 있습니다.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use mongodb::ClientSession;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::User;
use crate::domain::entities::{Entity, Page};
use crate::domain::models::events::DomainEvent;
use crate::events::EventProducer;
use crate::repositories::{PrincipalStore, Repository};
use crate::transactions::{Transaction, TransactionManager, TxState};
use crate::utils::clock::{Clock, IdGenerator};

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// 수동으로만 움직이는 시계
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(at) }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... 순서로 ID를 만듭니다.
pub struct SequentialIds {
    prefix: &'static str,
    next: AtomicUsize,
}

impl SequentialIds {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next: AtomicUsize::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn new_id(&self) -> String {
        format!("{}-{}", self.prefix, self.next.fetch_add(1, Ordering::SeqCst))
    }
}

/// 트랜잭션을 무시하고 즉시 반영하는 메모리 저장소
pub struct MemoryRepository<E: Entity> {
    items: Mutex<BTreeMap<String, E>>,
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
        }
    }
}

impl<E: Entity> MemoryRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(items: impl IntoIterator<Item = E>) -> Self {
        let repo = Self::new();
        for item in items {
            repo.insert(item);
        }
        repo
    }

    pub fn insert(&self, item: E) {
        self.items
            .lock()
            .unwrap()
            .insert(item.id().to_string(), item);
    }

    pub fn remove(&self, id: &str) {
        self.items.lock().unwrap().remove(id);
    }

    pub fn snapshot(&self, id: &str) -> Option<E> {
        self.items.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    fn lookup(&self, id: &str) -> AppResult<E> {
        self.snapshot(id)
            .ok_or_else(|| AppError::not_found(E::RESOURCE.as_str(), id))
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn create(&self, _tx: &mut dyn Transaction, entity: &E) -> AppResult<()> {
        self.insert(entity.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> AppResult<E> {
        self.lookup(id)
    }

    async fn get_in_tx(&self, _tx: &mut dyn Transaction, id: &str) -> AppResult<E> {
        self.lookup(id)
    }

    async fn list(&self, filter: &E::Filter, page: Page) -> AppResult<Vec<E>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|item| item.matches(filter))
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &E::Filter) -> AppResult<u64> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|item| item.matches(filter))
            .count() as u64)
    }

    async fn update(&self, _tx: &mut dyn Transaction, entity: &E) -> AppResult<()> {
        let mut items = self.items.lock().unwrap();
        match items.get_mut(entity.id()) {
            Some(stored) => {
                *stored = entity.clone();
                Ok(())
            }
            None => Err(AppError::not_found(E::RESOURCE.as_str(), entity.id())),
        }
    }

    async fn delete(&self, _tx: &mut dyn Transaction, id: &str) -> AppResult<()> {
        match self.items.lock().unwrap().remove(id) {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(E::RESOURCE.as_str(), id)),
        }
    }
}

#[async_trait]
impl PrincipalStore for MemoryRepository<User> {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.snapshot(id))
    }
}

/// 커밋/롤백 호출 횟수를 기록하는 트랜잭션 생성기
#[derive(Default)]
pub struct RecordingTransactionManager {
    begun: AtomicUsize,
    commits: Arc<AtomicUsize>,
    rollbacks: Arc<AtomicUsize>,
    fail_commit: Option<AppError>,
    fail_begin: Option<AppError>,
}

impl RecordingTransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_commit(error: AppError) -> Self {
        Self {
            fail_commit: Some(error),
            ..Self::default()
        }
    }

    pub fn failing_begin(error: AppError) -> Self {
        Self {
            fail_begin: Some(error),
            ..Self::default()
        }
    }

    pub fn begun(&self) -> usize {
        self.begun.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionManager for RecordingTransactionManager {
    async fn new_tx(&self) -> AppResult<Box<dyn Transaction>> {
        if let Some(error) = &self.fail_begin {
            return Err(error.clone());
        }
        self.begun.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingTx {
            state: TxState::Open,
            commits: self.commits.clone(),
            rollbacks: self.rollbacks.clone(),
            fail_commit: self.fail_commit.clone(),
        }))
    }
}

/// 실제 `MongoTransaction`과 같은 상태 규칙을 따르는 더블.
/// `commits`/`rollbacks`는 호출 횟수입니다 (no-op 롤백 포함).
pub struct RecordingTx {
    state: TxState,
    commits: Arc<AtomicUsize>,
    rollbacks: Arc<AtomicUsize>,
    fail_commit: Option<AppError>,
}

impl RecordingTx {
    pub fn open() -> Self {
        Self {
            state: TxState::Open,
            commits: Arc::default(),
            rollbacks: Arc::default(),
            fail_commit: None,
        }
    }
}

#[async_trait]
impl Transaction for RecordingTx {
    fn state(&self) -> TxState {
        self.state
    }

    fn session(&mut self) -> Option<&mut ClientSession> {
        None
    }

    async fn commit(&mut self) -> AppResult<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if self.state != TxState::Open {
            return Err(AppError::unexpected("already terminal"));
        }
        if let Some(error) = &self.fail_commit {
            self.state = TxState::Failed;
            return Err(error.clone());
        }
        self.state = TxState::Committed;
        Ok(())
    }

    async fn rollback(&mut self) -> AppResult<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        if self.state == TxState::Open {
            self.state = TxState::RolledBack;
        }
        Ok(())
    }
}

/// 보낸 이벤트를 모아두는 생산자. 실패하도록 설정할 수 있습니다.
#[derive(Default)]
pub struct RecordingEventProducer {
    events: Mutex<Vec<DomainEvent>>,
    fail_with: Option<AppError>,
}

impl RecordingEventProducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: AppError) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail_with: Some(error),
        }
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventProducer for RecordingEventProducer {
    async fn send(&self, _tx: &mut dyn Transaction, event: DomainEvent) -> AppResult<()> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
