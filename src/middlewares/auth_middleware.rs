//! Bearer 토큰 인증 미들웨어
//!
//! 요청의 `Authorization` 헤더를 주체(`Principal`)로 해석해 request extensions에 저장합니다.
//!
//! | 헤더 | Required | Optional |
//! |------|----------|----------|
//! | 없음 | 401 | 익명 `guest` 주체 |
//! | 잘못된 토큰 | 401 | 401 |
//! | 유효한 토큰 | 주체 | 주체 |

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::middlewares::auth_inner::{AuthMiddlewareService, Authenticator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 토큰 필수
    Required,
    /// 토큰이 없으면 익명 주체로 진행
    Optional,
}

pub struct AuthMiddleware {
    mode: AuthMode,
    /// 없으면 요청마다 `ServiceLocator`에서 찾습니다.
    authenticator: Option<Authenticator>,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            authenticator: None,
        }
    }

    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    /// 레지스트리 대신 주어진 서비스로 인증합니다.
    pub fn with_authenticator(mode: AuthMode, authenticator: Authenticator) -> Self {
        Self {
            mode,
            authenticator: Some(authenticator),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode,
            authenticator: self.authenticator.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, web, App, HttpResponse};
    use chrono::Duration;

    use super::*;
    use crate::config::TokenSettings;
    use crate::domain::entities::users::{NewUser, User};
    use crate::domain::models::auth::{Login, Principal};
    use crate::domain::models::token::Token;
    use crate::services::auth::{PasswordHasher, PermissionEvaluator, PermissionTable, TokenService};
    use crate::test_support::{epoch, FixedClock, MemoryRepository, SequentialIds};

    async fn whoami(principal: Principal) -> HttpResponse {
        HttpResponse::Ok().body(format!("{}:{}", principal.id, principal.group))
    }

    fn authenticator() -> (Authenticator, Arc<TokenService>) {
        let user = User::new(
            "U1".to_string(),
            NewUser {
                email: "u@x.com".to_string(),
                username: "user1".to_string(),
                display_name: "User".to_string(),
                password: "s3cret".to_string(),
            },
            bcrypt::hash("s3cret", 4).unwrap(),
            epoch(),
        );
        let evaluator = Arc::new(PermissionEvaluator::new(Arc::new(PermissionTable::default_table())));
        let tokens = Arc::new(TokenService::new(
            Arc::new(MemoryRepository::with([user])),
            evaluator.clone(),
            PasswordHasher::new(4),
            Arc::new(FixedClock::new(epoch())),
            Arc::new(SequentialIds::new("jti")),
            TokenSettings::new("middleware-secret", Duration::minutes(15), Duration::days(7)),
        ));
        (Authenticator::new(tokens.clone(), evaluator), tokens)
    }

    async fn access_token(tokens: &TokenService) -> Token {
        tokens
            .create_token(Login::new("u@x.com", "s3cret"))
            .await
            .unwrap()
            .access
    }

    #[actix_web::test]
    async fn test_required_mode() {
        let (authenticator, tokens) = authenticator();
        let app = test::init_service(
            App::new().service(
                web::resource("/me")
                    .wrap(AuthMiddleware::with_authenticator(AuthMode::Required, authenticator))
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let missing = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let token = access_token(&tokens).await;
        let ok = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/me")
                .insert_header(("Authorization", format!("Bearer {}", token.as_str())))
                .to_request(),
        )
        .await;
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(test::read_body(ok).await, "U1:user");
    }

    #[actix_web::test]
    async fn test_optional_mode() {
        let (authenticator, _) = authenticator();
        let app = test::init_service(
            App::new().service(
                web::resource("/items")
                    .wrap(AuthMiddleware::with_authenticator(AuthMode::Optional, authenticator))
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let anonymous = test::call_service(&app, test::TestRequest::get().uri("/items").to_request()).await;
        assert_eq!(anonymous.status(), StatusCode::OK);
        assert_eq!(test::read_body(anonymous).await, "anonymous:guest");

        let garbage = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/items")
                .insert_header(("Authorization", "Bearer not-a-token"))
                .to_request(),
        )
        .await;
        assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    }
}
