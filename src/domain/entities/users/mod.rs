//! Users Entity Module
//!
//! 인증 주체이자 `user_*` 권한의 대상이 되는 사용자 엔티티입니다.

pub mod user;

pub use user::{NewUser, User, UserChanges, UserFilter, UserResponse};
