//! # Application Error Taxonomy
//!
//! 인증/인가 코어와 커맨드 코디네이터가 공유하는 단일 에러 분류 체계입니다.
//! 모든 계층은 이 타입을 그대로 전달하며, 중간 계층에서 재포장하거나 삼키지 않습니다.
//! 프로토콜별 상태 코드 변환은 전송 계층(`actix_web::ResponseError`)에서만 수행합니다.
//!
//! ## HTTP 응답 매핑
//!
//! | AppError | HTTP Status | 사용 시나리오 |
//! |----------|-------------|---------------|
//! | `InvalidCredentials` | 401 Unauthorized | 이메일/비밀번호 불일치 (구분하지 않음) |
//! | `BadToken` | 401 Unauthorized | 서명/형식 오류, 만료, 토큰 종류 불일치 |
//! | `PermissionDenied` | 403 Forbidden | 그룹 권한 또는 객체 규칙 위반 |
//! | `EntityNotFound` | 404 Not Found | 주체/엔티티 없음 (검사 이후 사라진 경우 포함) |
//! | `InvalidForm` | 400 Bad Request | 필드 단위 입력값 검증 실패 |
//! | `UnexpectedBehavior` | 500 Internal Server Error | 저장소/인프라 오류, 타임아웃 |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::core::errors::{AppError, AppResult, ErrorContext};
//!
//! async fn load(repo: &dyn Repository<Equipment>, id: &str) -> AppResult<Equipment> {
//!     // 저장소 에러는 UnexpectedBehavior, 없으면 EntityNotFound
//!     repo.get(id).await
//! }
//!
//! let table = std::fs::read_to_string(path).context("권한 테이블 파일 읽기 실패")?;
//! ```

use std::collections::BTreeMap;
use std::fmt::Display;

use actix_web::http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::models::auth::permission::PermissionId;

/// 필드별 검증 실패 코드 모음
///
/// `{"email": ["email"], "name": ["length"]}` 형태로 직렬화되어
/// 클라이언트에 그대로 전달됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 단일 필드 에러로 구성된 에러 모음을 생성합니다.
    pub fn single(field: &str, code: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, code);
        errors
    }

    pub fn add(&mut self, field: &str, code: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(code.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn codes(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form = FormErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                form.add(field.as_ref(), error.code.as_ref());
            }
        }
        form
    }
}

/// 애플리케이션 전역 에러 타입
///
/// 코어의 모든 연산은 `Result<T, AppError>`를 반환합니다.
/// `Clone + PartialEq`를 구현하므로 하위 계층에서 올라온 에러가
/// 변형 없이 전달되었는지 테스트에서 직접 비교할 수 있습니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// 로그인 실패
    ///
    /// 존재하지 않는 이메일과 잘못된 비밀번호를 구분하지 않습니다.
    /// 사용자 열거 공격을 막기 위해 메시지도 하나로 고정합니다.
    #[error("이메일 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,

    /// 토큰 검증 실패 (형식, 서명, 만료, 종류 불일치)
    #[error("유효하지 않거나 만료된 토큰입니다")]
    BadToken,

    /// 그룹 권한 또는 객체 규칙에 의해 거부됨
    #[error("권한이 없습니다: {permission}")]
    PermissionDenied { permission: String },

    /// 주체 또는 엔티티가 존재하지 않음
    #[error("리소스를 찾을 수 없습니다 ({entity}: {id})")]
    EntityNotFound { entity: &'static str, id: String },

    /// 필드 단위 입력값 검증 실패
    #[error("입력값 검증에 실패했습니다")]
    InvalidForm(FormErrors),

    /// 인프라/저장소 오류
    ///
    /// `cause`는 로그 전용입니다. 클라이언트 응답에는 포함되지 않습니다.
    #[error("예상하지 못한 오류가 발생했습니다")]
    UnexpectedBehavior { cause: String },
}

impl AppError {
    pub fn unexpected(cause: impl Display) -> Self {
        AppError::UnexpectedBehavior {
            cause: cause.to_string(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        AppError::EntityNotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn denied(permission: PermissionId) -> Self {
        AppError::PermissionDenied {
            permission: permission.to_string(),
        }
    }

    /// 클라이언트에 노출되는 안정적인 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::BadToken => "bad_token",
            AppError::PermissionDenied { .. } => "permission_denied",
            AppError::EntityNotFound { .. } => "entity_not_found",
            AppError::InvalidForm(_) => "invalid_form",
            AppError::UnexpectedBehavior { .. } => "unexpected_behavior",
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::InvalidForm(FormErrors::from(errors))
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::BadToken => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            AppError::EntityNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            AppError::UnexpectedBehavior { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 5xx 에러의 원인은 서버 로그에만 기록하고, 클라이언트에는
    /// 고정된 메시지만 전달합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let mut body = serde_json::json!({
            "error": self.code(),
            "message": self.to_string(),
        });

        match self {
            AppError::InvalidForm(fields) => {
                body["fields"] = serde_json::json!(fields);
            }
            AppError::UnexpectedBehavior { cause } => {
                log::error!("요청 처리 중 내부 오류: {}", cause);
            }
            _ => {}
        }

        actix_web::HttpResponse::build(self.status_code()).json(body)
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 `UnexpectedBehavior`로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::unexpected(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::unexpected(format!("{}: {}", f(), e)))
    }
}
