//! 사용자 엔티티
//!
//! 인증 주체의 영속 레코드입니다. 비밀번호는 bcrypt 해시로만 보관되며,
//! `Debug` 출력과 응답/이벤트 스냅샷(`UserResponse`)에는 절대 포함되지 않습니다.

use std::fmt;

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::entity::{eq_or_any, push_eq, Entity, Owned};
use crate::domain::models::auth::login::normalize_email;
use crate::domain::models::auth::permission::Resource;

/// 신규 가입자에게 부여되는 기본 그룹
pub const DEFAULT_GROUP: &str = "user";

#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub group: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("group", &self.group)
            .field("password_hash", &"***")
            .finish()
    }
}

impl User {
    pub fn new(
        id: String,
        input: NewUser,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email: normalize_email(&input.email),
            username: input.username,
            display_name: input.display_name,
            password_hash,
            group: DEFAULT_GROUP.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 변경 가능한 프로필 필드만 반영합니다. 그룹과 이메일은 바뀌지 않습니다.
    pub fn apply_changes(&mut self, changes: UserChanges, now: DateTime<Utc>) {
        if let Some(username) = changes.username {
            self.username = username;
        }
        if let Some(display_name) = changes.display_name {
            self.display_name = display_name;
        }
        self.updated_at = now;
    }
}

/// 회원 가입 입력
///
/// 그룹 필드가 없으므로 가입으로 권한을 올릴 수 없습니다.
#[derive(Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(length(min = 1, max = 64))]
    pub display_name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserChanges {
    #[validate(length(min = 3, max = 32))]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub group: Option<String>,
    pub email: Option<String>,
}

impl UserFilter {
    /// 저장된 이메일과 같은 형태로 비교합니다.
    fn normalized_email(&self) -> Option<String> {
        self.email.as_deref().map(normalize_email)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub group: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            display_name: user.display_name,
            group: user.group,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl Entity for User {
    const RESOURCE: Resource = Resource::User;
    const COLLECTION: &'static str = "users";

    type Create = NewUser;
    type Update = UserChanges;
    type Filter = UserFilter;
    type Response = UserResponse;

    fn id(&self) -> &str {
        &self.id
    }

    fn filter_document(filter: &UserFilter) -> Document {
        let mut document = doc! {};
        push_eq(&mut document, "group", &filter.group);
        push_eq(&mut document, "email", &filter.normalized_email());
        document
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        eq_or_any(&filter.group, &self.group) && eq_or_any(&filter.normalized_email(), &self.email)
    }
}

/// 사용자 레코드의 소유자는 자기 자신입니다.
impl Owned for User {
    fn owner_id(&self) -> &str {
        &self.id
    }
}
