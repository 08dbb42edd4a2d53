use std::collections::HashSet;
use std::future::{ready, Ready};
use std::sync::Arc;

use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::core::errors::AppError;
use crate::domain::models::auth::permission::PermissionId;

/// 요청에 연결된 인증 주체
///
/// 토큰 페이로드가 아니라 저장소에서 다시 조회한 사용자로부터 만들어집니다.
/// 요청 처리 중에는 변경되지 않으며, 이 코어에서 저장되지도 않습니다.
/// 권한 집합은 그룹별 권한 테이블의 항목을 공유합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: String,
    pub group: String,
    pub permissions: Arc<HashSet<PermissionId>>,
}

impl Principal {
    pub fn new(
        id: impl Into<String>,
        group: impl Into<String>,
        permissions: Arc<HashSet<PermissionId>>,
    ) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
            permissions,
        }
    }

    pub fn has(&self, permission: PermissionId) -> bool {
        self.permissions.contains(&permission)
    }

    /// 정렬된 권한 문자열 목록 (응답 렌더링용)
    pub fn permission_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.permissions.iter().map(ToString::to_string).collect();
        names.sort();
        names
    }
}

/// 인증 미들웨어가 Request Extensions에 저장한 주체를 꺼냅니다.
///
/// 미들웨어가 적용되지 않은 라우트에서 사용하면 `BadToken`으로 실패합니다.
impl FromRequest for Principal {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Principal>() {
            Some(principal) => ready(Ok(principal.clone())),
            None => ready(Err(AppError::BadToken)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::auth::permission::{Action, Resource};

    #[test]
    fn test_has_permission() {
        let grants = Arc::new(HashSet::from([PermissionId::of(Resource::Tag, Action::Get)]));
        let principal = Principal::new("U1", "user", grants);

        assert!(principal.has(PermissionId::of(Resource::Tag, Action::Get)));
        assert!(!principal.has(PermissionId::of(Resource::Tag, Action::Delete)));
        assert_eq!(principal.permission_names(), vec!["tag_get".to_string()]);
    }

    #[actix_web::test]
    async fn test_extractor_without_middleware_fails() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        let result = Principal::extract(&req).await;
        assert_eq!(result.unwrap_err(), AppError::BadToken);
    }

    #[actix_web::test]
    async fn test_extractor_reads_extensions() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        let principal = Principal::new("U1", "admin", Arc::new(HashSet::new()));
        req.extensions_mut().insert(principal.clone());

        assert_eq!(Principal::extract(&req).await.unwrap(), principal);
    }
}
