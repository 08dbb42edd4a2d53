use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::entity::{eq_or_any, push_eq, Entity, Mutable, Owned};
use crate::domain::models::auth::permission::Resource;

/// 게시글에 대한 좋아요
///
/// 생성 후에는 바꿀 필드가 없습니다. 수정 커맨드는 `updated`
/// 이벤트만 남기며, 기본 권한 테이블은 `like_update`를 누구에게도 주지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    #[serde(rename = "_id")]
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewLike {
    #[validate(length(min = 1))]
    pub post_id: String,
    #[validate(length(min = 1))]
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LikeChanges {}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LikeFilter {
    pub post_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeResponse {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Like> for LikeResponse {
    fn from(like: Like) -> Self {
        Self {
            id: like.id,
            post_id: like.post_id,
            user_id: like.user_id,
            created_at: like.created_at,
        }
    }
}

impl Entity for Like {
    const RESOURCE: Resource = Resource::Like;
    const COLLECTION: &'static str = "likes";

    type Create = NewLike;
    type Update = LikeChanges;
    type Filter = LikeFilter;
    type Response = LikeResponse;

    fn id(&self) -> &str {
        &self.id
    }

    fn filter_document(filter: &LikeFilter) -> Document {
        let mut document = doc! {};
        push_eq(&mut document, "post_id", &filter.post_id);
        push_eq(&mut document, "user_id", &filter.user_id);
        document
    }

    fn matches(&self, filter: &LikeFilter) -> bool {
        eq_or_any(&filter.post_id, &self.post_id) && eq_or_any(&filter.user_id, &self.user_id)
    }
}

impl Mutable for Like {
    fn build(input: NewLike, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            post_id: input.post_id,
            user_id: input.user_id,
            created_at: now,
        }
    }

    fn apply(&mut self, _changes: LikeChanges, _now: DateTime<Utc>) {}
}

impl Owned for Like {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

impl Owned for NewLike {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}
