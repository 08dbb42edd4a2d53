use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::entity::{eq_or_any, push_eq, Entity, Mutable};
use crate::domain::models::auth::permission::Resource;

/// 게시글 분류용 태그. 소유자가 없으므로 객체 규칙도 없습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTag {
    #[validate(length(min = 1, max = 40))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TagChanges {
    #[validate(length(min = 1, max = 40))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagFilter {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagResponse {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            created_at: tag.created_at,
            updated_at: tag.updated_at,
        }
    }
}

impl Entity for Tag {
    const RESOURCE: Resource = Resource::Tag;
    const COLLECTION: &'static str = "tags";

    type Create = NewTag;
    type Update = TagChanges;
    type Filter = TagFilter;
    type Response = TagResponse;

    fn id(&self) -> &str {
        &self.id
    }

    fn filter_document(filter: &TagFilter) -> Document {
        let mut document = doc! {};
        push_eq(&mut document, "name", &filter.name);
        document
    }

    fn matches(&self, filter: &TagFilter) -> bool {
        eq_or_any(&filter.name, &self.name)
    }
}

impl Mutable for Tag {
    fn build(input: NewTag, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: TagChanges, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        self.updated_at = now;
    }
}
