use std::sync::Arc;

use crate::core::errors::AppResult;
use crate::domain::entities::Entity;
use crate::domain::models::auth::{Action, PermissionId, Principal};
use crate::services::auth::permission_service::PermissionEvaluator;
use crate::services::auth::rules::{ObjectRef, PermissionRule};

/// 엔티티 하나에 대한 커맨드 인가
///
/// 호출 순서는 항상 `authorize` → (필요하면 대상 조회) → `authorize_object`입니다.
/// 어느 단계든 실패하면 그 뒤의 조회/변경/이벤트는 시도되지 않습니다.
pub struct AuthorizationGate<E: Entity> {
    evaluator: Arc<PermissionEvaluator>,
    rule: Option<Arc<dyn PermissionRule<E>>>,
}

impl<E: Entity> AuthorizationGate<E> {
    pub fn new(evaluator: Arc<PermissionEvaluator>, rule: Option<Arc<dyn PermissionRule<E>>>) -> Self {
        Self { evaluator, rule }
    }

    /// 그룹 권한 검사. 통과하면 검사한 권한 식별자를 돌려줍니다.
    pub fn authorize(&self, principal: &Principal, action: Action) -> AppResult<PermissionId> {
        let permission = PermissionId::of(E::RESOURCE, action);
        self.evaluator.has_permission(principal, permission)?;
        Ok(permission)
    }

    /// 객체 규칙 검사
    pub fn authorize_object(
        &self,
        principal: &Principal,
        permission: PermissionId,
        object: ObjectRef<'_, E>,
    ) -> AppResult<()> {
        self.evaluator
            .has_object_permission(principal, permission, self.rule.as_deref(), object)
    }
}
