//! # Domain Entities Module
//!
//! MongoDB 컬렉션과 1:1로 대응하는 엔티티들입니다. 모든 엔티티는
//! UUID v4 문자열 `_id`를 가지며 [`entity::Entity`] 계약을 구현합니다.
//!
//! | 엔티티 | 컬렉션 | 소유자 필드 |
//! |--------|--------|-------------|
//! | `User` | `users` | 자기 자신 |
//! | `Equipment` | `equipment` | `owner_id` |
//! | `Post` | `posts` | `author_id` |
//! | `Tag` | `tags` | 없음 |
//! | `Like` | `likes` | `user_id` |

pub mod entity;
pub mod equipment;
pub mod likes;
pub mod posts;
pub mod tags;
pub mod users;

pub use entity::{Entity, Mutable, Owned, Page};
pub use equipment::Equipment;
pub use likes::Like;
pub use posts::Post;
pub use tags::Tag;
pub use users::User;
