//! # 엔티티 공통 계약
//!
//! 게시글, 태그, 좋아요, 장비, 사용자는 모두 같은 모양의 저장소/서비스/유스케이스를
//! 공유합니다. 엔티티별 차이(입력 DTO, 필터, 응답 형태, 소유자)는 이 모듈의
//! trait 연관 타입으로 표현됩니다.
//!
//! ```rust,ignore
//! impl Entity for Equipment {
//!     const RESOURCE: Resource = Resource::Equipment;
//!     const COLLECTION: &'static str = "equipment";
//!     type Create = NewEquipment;
//!     type Update = EquipmentChanges;
//!     type Filter = EquipmentFilter;
//!     type Response = EquipmentResponse;
//!     // ...
//! }
//! ```

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use mongodb::bson::Document;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::auth::permission::Resource;

pub trait Entity:
    Clone + Debug + Serialize + DeserializeOwned + Unpin + Send + Sync + 'static
{
    const RESOURCE: Resource;
    const COLLECTION: &'static str;

    /// 생성 입력
    type Create: Debug + DeserializeOwned + Validate + Send + Sync + 'static;
    /// 수정 입력
    type Update: Debug + DeserializeOwned + Validate + Send + Sync + 'static;
    /// 목록 조회 필터 (쿼리 스트링)
    type Filter: Debug + DeserializeOwned + Default + Send + Sync + 'static;
    /// 클라이언트 및 이벤트 스냅샷에 노출되는 형태
    type Response: Serialize + From<Self>;

    fn id(&self) -> &str;

    /// 필터를 MongoDB 쿼리 문서로 변환합니다.
    fn filter_document(filter: &Self::Filter) -> Document;

    /// 필터 조건을 메모리에서 평가합니다. `filter_document`와 같은 의미여야 합니다.
    fn matches(&self, filter: &Self::Filter) -> bool;
}

/// 입력만으로 생성/수정할 수 있는 엔티티
///
/// 비밀번호 해싱처럼 부가 처리가 필요한 엔티티(사용자)는 구현하지 않고
/// 전용 도메인 서비스를 둡니다.
pub trait Mutable: Entity {
    fn build(input: Self::Create, id: String, now: DateTime<Utc>) -> Self;

    fn apply(&mut self, changes: Self::Update, now: DateTime<Utc>);
}

/// 소유자가 있는 대상 (영속 엔티티와 생성 입력 모두)
pub trait Owned {
    fn owner_id(&self) -> &str;
}

fn default_limit() -> u64 {
    20
}

/// 목록 조회 페이지 파라미터
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate)]
pub struct Page {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// 선택적 필드가 있으면 필터 문서에 추가합니다.
pub(crate) fn push_eq(document: &mut Document, field: &str, value: &Option<String>) {
    if let Some(value) = value {
        document.insert(field, value.clone());
    }
}

/// 선택적 필터 값이 없거나 실제 값과 같으면 참
pub(crate) fn eq_or_any(filter: &Option<String>, actual: &str) -> bool {
    filter.as_deref().is_none_or(|expected| expected == actual)
}
