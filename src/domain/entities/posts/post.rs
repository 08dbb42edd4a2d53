use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::entity::{eq_or_any, push_eq, Entity, Mutable, Owned};
use crate::domain::models::auth::permission::Resource;

/// 게시글. 태그와 장비를 ID로 참조합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(default)]
    pub equipment_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPost {
    #[validate(length(min = 1))]
    pub author_id: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 20000))]
    pub body: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub tag_ids: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub equipment_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostChanges {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 20000))]
    pub body: Option<String>,
    #[validate(length(max = 20))]
    pub tag_ids: Option<Vec<String>>,
    #[validate(length(max = 20))]
    pub equipment_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFilter {
    pub author_id: Option<String>,
    pub tag_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    pub tag_ids: Vec<String>,
    pub equipment_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            title: post.title,
            body: post.body,
            tag_ids: post.tag_ids,
            equipment_ids: post.equipment_ids,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl Entity for Post {
    const RESOURCE: Resource = Resource::Post;
    const COLLECTION: &'static str = "posts";

    type Create = NewPost;
    type Update = PostChanges;
    type Filter = PostFilter;
    type Response = PostResponse;

    fn id(&self) -> &str {
        &self.id
    }

    fn filter_document(filter: &PostFilter) -> Document {
        let mut document = doc! {};
        push_eq(&mut document, "author_id", &filter.author_id);
        // 배열 필드에 대한 동등 비교는 원소 포함 여부로 평가된다
        push_eq(&mut document, "tag_ids", &filter.tag_id);
        document
    }

    fn matches(&self, filter: &PostFilter) -> bool {
        eq_or_any(&filter.author_id, &self.author_id)
            && filter
                .tag_id
                .as_ref()
                .is_none_or(|tag| self.tag_ids.contains(tag))
    }
}

impl Mutable for Post {
    fn build(input: NewPost, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            author_id: input.author_id,
            title: input.title,
            body: input.body,
            tag_ids: input.tag_ids,
            equipment_ids: input.equipment_ids,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: PostChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(body) = changes.body {
            self.body = body;
        }
        if let Some(tag_ids) = changes.tag_ids {
            self.tag_ids = tag_ids;
        }
        if let Some(equipment_ids) = changes.equipment_ids {
            self.equipment_ids = equipment_ids;
        }
        self.updated_at = now;
    }
}

impl Owned for Post {
    fn owner_id(&self) -> &str {
        &self.author_id
    }
}

impl Owned for NewPost {
    fn owner_id(&self) -> &str {
        &self.author_id
    }
}
