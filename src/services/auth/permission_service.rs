//! # 권한 평가
//!
//! 그룹 → 권한 집합 테이블은 기동 시 한 번 만들어지고 이후 변경되지 않습니다.
//! 읽기 전용이므로 잠금 없이 `Arc`로 공유됩니다.
//!
//! ## 검사 순서
//!
//! ```text
//! has_permission(principal, equipment_update)          ← 그룹 권한
//!   └─ has_object_permission(..., Persisted(&entity))  ← 엔티티별 규칙 (없으면 허용)
//! ```
//!
//! ## 권한 파일 형식
//!
//! ```json
//! {
//!   "admin": ["equipment_create", "equipment_moderate"],
//!   "user":  ["equipment_get", "equipment_list"]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::config::PermissionConfig;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::core::registry::Service;
use crate::domain::entities::users::User;
use crate::domain::entities::Entity;
use crate::domain::models::auth::{Action, PermissionId, Principal, Resource};
use crate::services::auth::rules::{ObjectRef, PermissionRule};

pub const ADMIN_GROUP: &str = "admin";
pub const USER_GROUP: &str = "user";
pub const GUEST_GROUP: &str = "guest";

/// 토큰 없이 들어온 요청의 주체 ID
pub const ANONYMOUS_ID: &str = "anonymous";

/// 불변 그룹별 권한 테이블
#[derive(Debug, Clone)]
pub struct PermissionTable {
    grants: HashMap<String, Arc<HashSet<PermissionId>>>,
    empty: Arc<HashSet<PermissionId>>,
}

impl PermissionTable {
    pub fn new(grants: HashMap<String, HashSet<PermissionId>>) -> Self {
        Self {
            grants: grants
                .into_iter()
                .map(|(group, set)| (group, Arc::new(set)))
                .collect(),
            empty: Arc::new(HashSet::new()),
        }
    }

    /// 내장 기본 테이블
    pub fn default_table() -> Self {
        use Action as A;
        use Resource as R;

        let crud = [A::Create, A::Get, A::List, A::Update, A::Delete];
        let read = [A::Get, A::List];
        let grant = |resource: R, actions: &[A]| -> Vec<PermissionId> {
            actions.iter().map(|a| PermissionId::of(resource, *a)).collect()
        };

        let mut user = HashSet::new();
        user.extend(grant(R::Equipment, &crud));
        user.extend(grant(R::Post, &crud));
        user.extend(grant(R::Like, &[A::Create, A::Get, A::List, A::Delete]));
        user.extend(grant(R::Tag, &read));
        user.extend(grant(R::User, &[A::Get, A::Update, A::Delete]));

        let mut guest = HashSet::new();
        for resource in [R::Equipment, R::Post, R::Tag, R::Like] {
            guest.extend(grant(resource, &read));
        }
        guest.insert(PermissionId::of(R::User, A::Create));

        let mut admin: HashSet<PermissionId> = PermissionId::all().collect();
        // 좋아요는 수정할 필드가 없다
        admin.remove(&PermissionId::of(R::Like, A::Update));

        Self::new(HashMap::from([
            (ADMIN_GROUP.to_string(), admin),
            (USER_GROUP.to_string(), user),
            (GUEST_GROUP.to_string(), guest),
        ]))
    }

    /// `{group: [permission_id, ...]}` JSON을 읽습니다.
    ///
    /// # Errors
    ///
    /// JSON 형식 오류나 알 수 없는 권한 식별자가 있으면 `UnexpectedBehavior`
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let parsed: HashMap<String, Vec<String>> =
            serde_json::from_str(raw).context("권한 테이블 JSON 파싱 실패")?;

        let mut grants = HashMap::with_capacity(parsed.len());
        for (group, names) in parsed {
            let set = names
                .iter()
                .map(|name| name.parse::<PermissionId>())
                .collect::<Result<HashSet<_>, _>>()
                .with_context(|| format!("그룹 '{}'의 권한 목록이 올바르지 않습니다", group))?;
            grants.insert(group, set);
        }

        Ok(Self::new(grants))
    }

    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("권한 테이블 파일 읽기 실패: {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// `PERMISSIONS_FILE`이 있으면 파일에서, 없으면 내장 테이블을 사용합니다.
    pub fn load() -> AppResult<Self> {
        match PermissionConfig::permissions_file() {
            Some(path) => {
                log::info!("권한 테이블 로드: {}", path);
                Self::from_file(path)
            }
            None => Ok(Self::default_table()),
        }
    }

    /// 그룹의 권한 집합. 모르는 그룹은 빈 집합입니다.
    pub fn grants(&self, group: &str) -> Arc<HashSet<PermissionId>> {
        self.grants
            .get(group)
            .cloned()
            .unwrap_or_else(|| self.empty.clone())
    }

    pub fn group_count(&self) -> usize {
        self.grants.len()
    }
}

pub struct PermissionEvaluator {
    table: Arc<PermissionTable>,
}

impl Service for PermissionEvaluator {
    const NAME: &'static str = "permission";
}

impl PermissionEvaluator {
    pub fn new(table: Arc<PermissionTable>) -> Self {
        Self { table }
    }

    /// 저장소에서 조회한 사용자로부터 주체를 만듭니다.
    pub fn principal_for(&self, user: &User) -> Principal {
        Principal::new(user.id.as_str(), user.group.as_str(), self.table.grants(&user.group))
    }

    pub fn guest(&self) -> Principal {
        Principal::new(ANONYMOUS_ID, GUEST_GROUP, self.table.grants(GUEST_GROUP))
    }

    /// # Errors
    ///
    /// 주체의 그룹 권한에 없으면 `PermissionDenied`
    pub fn has_permission(&self, principal: &Principal, permission: PermissionId) -> AppResult<()> {
        if principal.has(permission) {
            Ok(())
        } else {
            Err(AppError::denied(permission))
        }
    }

    /// 그룹 권한을 다시 확인한 뒤 엔티티별 규칙을 적용합니다.
    ///
    /// 규칙이 등록되지 않은 엔티티는 그룹 권한만으로 허용됩니다.
    pub fn has_object_permission<E: Entity>(
        &self,
        principal: &Principal,
        permission: PermissionId,
        rule: Option<&dyn PermissionRule<E>>,
        object: ObjectRef<'_, E>,
    ) -> AppResult<()> {
        self.has_permission(principal, permission)?;

        match rule {
            Some(rule) if !rule.evaluate(principal, permission, object) => {
                Err(AppError::denied(permission))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::tags::{NewTag, Tag};
    use crate::domain::entities::users::NewUser;
    use crate::services::auth::rules::OwnershipRule;
    use crate::test_support::epoch;

    fn evaluator() -> PermissionEvaluator {
        PermissionEvaluator::new(Arc::new(PermissionTable::default_table()))
    }

    fn user_in(group: &str) -> User {
        let mut user = User::new(
            "U1".to_string(),
            NewUser {
                email: "u@x.com".to_string(),
                username: "user1".to_string(),
                display_name: "User".to_string(),
                password: "password".to_string(),
            },
            "hash".to_string(),
            epoch(),
        );
        user.group = group.to_string();
        user
    }

    #[test]
    fn test_permission_outside_group_grants_is_denied() {
        let evaluator = evaluator();
        let table = PermissionTable::default_table();

        for group in [USER_GROUP, GUEST_GROUP, "unknown"] {
            let principal = evaluator.principal_for(&user_in(group));
            let grants = table.grants(group);

            for permission in PermissionId::all() {
                let result = evaluator.has_permission(&principal, permission);
                if grants.contains(&permission) {
                    assert!(result.is_ok(), "{group} should hold {permission}");
                } else {
                    assert_eq!(
                        result.unwrap_err(),
                        AppError::PermissionDenied {
                            permission: permission.to_string()
                        }
                    );
                }
            }
        }
    }

    #[test]
    fn test_default_table_shape() {
        let table = PermissionTable::default_table();
        let user = table.grants(USER_GROUP);
        let guest = table.grants(GUEST_GROUP);
        let admin = table.grants(ADMIN_GROUP);

        assert!(user.contains(&PermissionId::of(Resource::Equipment, Action::Create)));
        assert!(!user.contains(&PermissionId::of(Resource::Tag, Action::Create)));
        assert!(!user.contains(&PermissionId::of(Resource::Equipment, Action::Moderate)));
        assert!(guest.contains(&PermissionId::of(Resource::User, Action::Create)));
        assert!(!guest.contains(&PermissionId::of(Resource::Post, Action::Create)));
        assert!(admin.contains(&PermissionId::of(Resource::Post, Action::Moderate)));
        assert!(!admin.contains(&PermissionId::of(Resource::Like, Action::Update)));
        assert!(table.grants("nobody").is_empty());
    }

    #[test]
    fn test_from_json() {
        let table = PermissionTable::from_json(
            r#"{"editor": ["post_update", "post_moderate"], "reader": []}"#,
        )
        .unwrap();

        assert_eq!(table.group_count(), 2);
        assert_eq!(table.grants("editor").len(), 2);
        assert!(table.grants("reader").is_empty());
    }

    #[test]
    fn test_from_json_rejects_unknown_permission() {
        let result = PermissionTable::from_json(r#"{"editor": ["post_publish"]}"#);
        match result {
            Err(AppError::UnexpectedBehavior { cause }) => assert!(cause.contains("editor")),
            other => panic!("Expected UnexpectedBehavior, got {:?}", other),
        }

        assert!(PermissionTable::from_json("not json").is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let result = PermissionTable::from_file("/nonexistent/permissions.json");
        assert!(matches!(result, Err(AppError::UnexpectedBehavior { .. })));
    }

    #[test]
    fn test_guest_principal() {
        let guest = evaluator().guest();
        assert_eq!(guest.id, ANONYMOUS_ID);
        assert!(guest.has(PermissionId::of(Resource::Tag, Action::List)));
    }

    #[test]
    fn test_object_permission_without_rule_defaults_to_allow() {
        let evaluator = evaluator();
        let admin = evaluator.principal_for(&user_in(ADMIN_GROUP));
        let input = NewTag {
            name: "film".to_string(),
        };

        let result = evaluator.has_object_permission::<Tag>(
            &admin,
            PermissionId::of(Resource::Tag, Action::Create),
            None,
            ObjectRef::Proposed(&input),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_object_permission_rechecks_group_grant() {
        let evaluator = evaluator();
        let user = evaluator.principal_for(&user_in(USER_GROUP));
        let input = NewTag {
            name: "film".to_string(),
        };

        let result = evaluator.has_object_permission::<Tag>(
            &user,
            PermissionId::of(Resource::Tag, Action::Create),
            None,
            ObjectRef::Proposed(&input),
        );
        assert!(matches!(result, Err(AppError::PermissionDenied { .. })));
    }

    #[test]
    fn test_object_rule_denial() {
        use crate::domain::entities::equipment::{Equipment, NewEquipment};

        let evaluator = evaluator();
        let user = evaluator.principal_for(&user_in(USER_GROUP));
        let rule = OwnershipRule;
        let foreign = NewEquipment {
            owner_id: "someone-else".to_string(),
            name: "Lens".to_string(),
            category: "camera".to_string(),
            description: None,
        };

        let result = evaluator.has_object_permission::<Equipment>(
            &user,
            PermissionId::of(Resource::Equipment, Action::Create),
            Some(&rule),
            ObjectRef::Proposed(&foreign),
        );
        assert_eq!(
            result.unwrap_err(),
            AppError::PermissionDenied {
                permission: "equipment_create".to_string()
            }
        );
    }
}
