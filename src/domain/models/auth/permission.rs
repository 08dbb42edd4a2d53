//! 권한 식별자 모델
//!
//! 권한은 `resource_action` 형태의 문자열(예: `equipment_create`)로 표현되며,
//! 내부적으로는 `(Resource, Action)` 쌍으로 다룹니다. 알 수 없는 리소스나
//! 액션은 파싱 단계에서 거부되므로, 권한 테이블에 오타가 섞여 들어갈 수 없습니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 권한 검사 대상이 되는 리소스 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    User,
    Post,
    Tag,
    Like,
    Equipment,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::User,
        Resource::Post,
        Resource::Tag,
        Resource::Like,
        Resource::Equipment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::User => "user",
            Resource::Post => "post",
            Resource::Tag => "tag",
            Resource::Like => "like",
            Resource::Equipment => "equipment",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Resource::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 리소스에 대해 수행하는 동작
///
/// `Moderate`는 실제 커맨드가 아니라 객체 규칙(소유권 검사)을 우회하는
/// 관리 권한입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Get,
    List,
    Update,
    Delete,
    Moderate,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Create,
        Action::Get,
        Action::List,
        Action::Update,
        Action::Delete,
        Action::Moderate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Get => "get",
            Action::List => "list",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Moderate => "moderate",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Action::ALL.into_iter().find(|a| a.as_str() == s)
    }
}

/// `resource_action` 형태의 권한 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PermissionId {
    pub resource: Resource,
    pub action: Action,
}

impl PermissionId {
    pub const fn of(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    /// 모든 리소스/액션 조합을 반환합니다. 관리자 그룹의 기본 권한에 사용됩니다.
    pub fn all() -> impl Iterator<Item = PermissionId> {
        Resource::ALL
            .into_iter()
            .flat_map(|r| Action::ALL.into_iter().map(move |a| PermissionId::of(r, a)))
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.resource.as_str(), self.action.as_str())
    }
}

/// 권한 문자열 파싱 실패
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("알 수 없는 권한 식별자: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for PermissionId {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // 리소스 이름에는 '_'가 없으므로 마지막 '_'를 기준으로 나눈다
        let (resource, action) = s
            .rsplit_once('_')
            .ok_or_else(|| UnknownPermission(s.to_string()))?;

        match (Resource::parse(resource), Action::parse(action)) {
            (Some(resource), Some(action)) => Ok(PermissionId::of(resource, action)),
            _ => Err(UnknownPermission(s.to_string())),
        }
    }
}

impl Serialize for PermissionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PermissionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let id = PermissionId::of(Resource::Equipment, Action::Create);
        assert_eq!(id.to_string(), "equipment_create");
        assert_eq!("equipment_create".parse::<PermissionId>().unwrap(), id);
        assert_eq!(
            "post_moderate".parse::<PermissionId>().unwrap(),
            PermissionId::of(Resource::Post, Action::Moderate)
        );
    }

    #[test]
    fn test_unknown_permissions_are_rejected() {
        for raw in ["equipment", "equipment_fly", "car_create", "", "_create"] {
            assert!(raw.parse::<PermissionId>().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_all_covers_every_pair() {
        assert_eq!(PermissionId::all().count(), 30);
    }

    #[test]
    fn test_serde_uses_string_form() {
        let json = serde_json::to_string(&PermissionId::of(Resource::Like, Action::Delete)).unwrap();
        assert_eq!(json, "\"like_delete\"");

        let parsed: Vec<PermissionId> = serde_json::from_str(r#"["tag_get","user_update"]"#).unwrap();
        assert_eq!(parsed[1], PermissionId::of(Resource::User, Action::Update));
        assert!(serde_json::from_str::<PermissionId>("\"tag_explode\"").is_err());
    }
}
