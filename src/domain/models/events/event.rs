use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::auth::permission::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Updated => "updated",
            EventKind::Deleted => "deleted",
        }
    }
}

/// 엔티티 변경 한 건에 대한 도메인 이벤트
///
/// 생성/수정 이벤트는 응답용 스냅샷을 담고, 삭제 이벤트는 ID만 담습니다.
/// 소비자는 `id`로 중복을 제거해야 합니다 (최소 한 번 전달).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: String,
    pub kind: EventKind,
    pub resource: Resource,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<serde_json::Value>,
    pub occurred_at: DateTime<Utc>,
}
