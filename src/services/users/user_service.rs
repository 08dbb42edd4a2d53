//! # 사용자 도메인 서비스
//!
//! 가입(생성)은 일반 엔티티와 달리 부가 처리가 필요합니다.
//!
//! 1. 이메일 정규화 후 입력 검증 (`validator`)
//! 2. 이메일 중복 검사 → `InvalidForm { email: ["already_taken"] }`
//! 3. bcrypt 해싱 (블로킹 풀)
//! 4. 기본 그룹 `user` 부여
//!
//! 중복 검사는 트랜잭션 밖의 조회이므로 동시 가입 경쟁은 이메일 유니크 인덱스가
//! 최종적으로 막습니다. 이 경우 삽입 실패는 `UnexpectedBehavior`로 보고됩니다.

use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use crate::core::errors::{AppError, AppResult, FormErrors};
use crate::domain::entities::users::{NewUser, User, UserChanges, UserFilter};
use crate::domain::entities::Page;
use crate::domain::models::auth::login::normalize_email;
use crate::repositories::{PrincipalStore, Repository};
use crate::services::auth::PasswordHasher;
use crate::services::entities::DomainService;
use crate::transactions::Transaction;
use crate::utils::clock::{Clock, IdGenerator};

pub struct UserService {
    users: Arc<dyn Repository<User>>,
    principals: Arc<dyn PrincipalStore>,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn Repository<User>>,
        principals: Arc<dyn PrincipalStore>,
        hasher: PasswordHasher,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            users,
            principals,
            hasher,
            clock,
            ids,
        }
    }
}

#[async_trait]
impl DomainService<User> for UserService {
    async fn create(&self, tx: &mut dyn Transaction, mut input: NewUser) -> AppResult<User> {
        // 로그인과 같은 규칙으로 정규화한 뒤 검증한다
        input.email = normalize_email(&input.email);
        input.validate()?;

        if self.principals.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::InvalidForm(FormErrors::single("email", "already_taken")));
        }

        let password_hash = self.hasher.hash(input.password.clone()).await?;
        let user = User::new(self.ids.new_id(), input, password_hash, self.clock.now());

        self.users.create(tx, &user).await?;
        log::debug!("사용자 생성: {}", user.id);
        Ok(user)
    }

    async fn update(&self, tx: &mut dyn Transaction, id: &str, changes: UserChanges) -> AppResult<User> {
        changes.validate()?;

        let mut user = self.users.get_in_tx(&mut *tx, id).await?;
        user.apply_changes(changes, self.clock.now());
        self.users.update(tx, &user).await?;
        Ok(user)
    }

    async fn delete(&self, tx: &mut dyn Transaction, id: &str) -> AppResult<()> {
        self.users.delete(tx, id).await
    }

    async fn get(&self, id: &str) -> AppResult<User> {
        self.users.get(id).await
    }

    async fn list(&self, filter: &UserFilter, page: Page) -> AppResult<(Vec<User>, u64)> {
        let items = self.users.list(filter, page).await?;
        let total = self.users.count(filter).await?;
        Ok((items, total))
    }
}
