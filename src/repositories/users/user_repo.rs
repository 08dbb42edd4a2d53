//! 사용자 저장소 확장
//!
//! 인증 경로는 트랜잭션 없이 이메일/ID로 주체를 조회합니다. 이 조회는
//! 일반 `Repository<User>` 계약과 별도로 [`PrincipalStore`]로 분리되어 있어,
//! `TokenService`는 사용자 저장소의 조회 기능에만 의존합니다.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::IndexModel;

use crate::core::errors::{AppResult, ErrorContext};
use crate::db::with_deadline;
use crate::domain::entities::users::User;
use crate::repositories::MongoRepository;

#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// 정규화된(소문자) 이메일로 조회합니다.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
}

#[async_trait]
impl PrincipalStore for MongoRepository<User> {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        with_deadline(self.timeout(), self.collection().find_one(doc! { "email": email })).await
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        with_deadline(self.timeout(), self.collection().find_one(doc! { "_id": id })).await
    }
}

impl MongoRepository<User> {
    /// 사용자 컬렉션 인덱스를 생성합니다.
    ///
    /// 이메일 유니크 인덱스는 가입 시 중복 검사와 삽입 사이의 경쟁을 막는 최종 방어선입니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        // 이메일 유니크 인덱스
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        // 생성일 인덱스
        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_asc".to_string())
                    .build(),
            )
            .build();

        self.collection()
            .create_indexes([email_index, created_at_index])
            .await
            .context("사용자 인덱스 생성 실패")?;

        Ok(())
    }
}
