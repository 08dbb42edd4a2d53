//! 엔티티별 객체 권한 규칙
//!
//! 그룹 권한 검사를 통과한 뒤 구체적인 대상에 대해 한 번 더 적용됩니다.
//! 생성 커맨드는 아직 존재하지 않는 엔티티를 다루므로 입력 페이로드를,
//! 조회/수정/삭제 커맨드는 저장소에서 읽은 엔티티를 대상으로 받습니다.

use crate::domain::entities::users::User;
use crate::domain::entities::{Entity, Owned};
use crate::domain::models::auth::{Action, PermissionId, Principal, Resource};

/// 규칙이 평가할 대상
pub enum ObjectRef<'a, E: Entity> {
    /// 생성 입력
    Proposed(&'a E::Create),
    /// 이미 저장된 엔티티
    Persisted(&'a E),
}

impl<E: Entity> Clone for ObjectRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Entity> Copy for ObjectRef<'_, E> {}

pub trait PermissionRule<E: Entity>: Send + Sync {
    fn evaluate(&self, principal: &Principal, permission: PermissionId, object: ObjectRef<'_, E>)
    -> bool;
}

/// 소유자만 생성/수정/삭제할 수 있습니다. `<resource>_moderate` 보유자는 예외입니다.
pub struct OwnershipRule;

impl<E> PermissionRule<E> for OwnershipRule
where
    E: Entity + Owned,
    E::Create: Owned,
{
    fn evaluate(&self, principal: &Principal, permission: PermissionId, object: ObjectRef<'_, E>) -> bool {
        if principal.has(PermissionId::of(E::RESOURCE, Action::Moderate)) {
            return true;
        }

        match permission.action {
            Action::Get | Action::List => true,
            _ => {
                let owner = match object {
                    ObjectRef::Proposed(input) => input.owner_id(),
                    ObjectRef::Persisted(entity) => entity.owner_id(),
                };
                owner == principal.id
            }
        }
    }
}

/// 사용자 레코드는 본인만 조회/수정/삭제할 수 있습니다.
///
/// 가입(생성)은 그룹 권한(`user_create`)만으로 결정됩니다.
pub struct SelfRule;

impl PermissionRule<User> for SelfRule {
    fn evaluate(&self, principal: &Principal, _permission: PermissionId, object: ObjectRef<'_, User>) -> bool {
        if principal.has(PermissionId::of(Resource::User, Action::Moderate)) {
            return true;
        }

        match object {
            ObjectRef::Proposed(_) => true,
            ObjectRef::Persisted(user) => user.id == principal.id,
        }
    }
}
