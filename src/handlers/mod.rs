//! HTTP 핸들러 모듈
//!
//! 핸들러는 요청을 도메인 호출로 옮기고 결과를 JSON으로 돌려주는 일만 합니다.
//! 에러는 `AppError`의 `ResponseError` 구현이 상태 코드로 변환합니다.
//!
//! | 에러 | 상태 |
//! |------|------|
//! | `InvalidCredentials`, `BadToken` | 401 |
//! | `PermissionDenied` | 403 |
//! | `EntityNotFound` | 404 |
//! | `InvalidForm` | 400 |
//! | `UnexpectedBehavior` | 500 |

pub mod auth;
pub mod entities;
