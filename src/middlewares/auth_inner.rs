//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::core::errors::{AppError, AppResult};
use crate::core::registry::Service as RegisteredService;
use crate::domain::models::auth::Principal;
use crate::domain::models::token::Token;
use crate::middlewares::auth_middleware::AuthMode;
use crate::services::auth::{PermissionEvaluator, TokenService};

/// 헤더 → 주체 해석기
#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<TokenService>,
    evaluator: Arc<PermissionEvaluator>,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenService>, evaluator: Arc<PermissionEvaluator>) -> Self {
        Self { tokens, evaluator }
    }

    pub fn from_registry() -> AppResult<Self> {
        Ok(Self::new(
            TokenService::instance()?,
            PermissionEvaluator::instance()?,
        ))
    }

    /// `header`는 `Authorization` 헤더 값입니다. 헤더가 없을 때만 모드가 결과를 가릅니다.
    pub async fn authenticate(&self, header: Option<&str>, mode: AuthMode) -> AppResult<Principal> {
        match (header, mode) {
            (None, AuthMode::Required) => Err(AppError::BadToken),
            (None, AuthMode::Optional) => Ok(self.evaluator.guest()),
            (Some(value), _) => {
                let token = Token::from_bearer_header(value)?;
                self.tokens.auth(&token).await
            }
        }
    }
}

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub authenticator: Option<Authenticator>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode;
        let authenticator = self.authenticator.clone();

        Box::pin(async move {
            // 읽을 수 없는 헤더 값은 빈 값으로 취급해 BadToken이 되게 한다
            let header = req
                .headers()
                .get(header::AUTHORIZATION)
                .map(|value| value.to_str().unwrap_or_default().to_string());

            let resolved = match authenticator {
                Some(authenticator) => Ok(authenticator),
                None => Authenticator::from_registry(),
            };
            let result = match resolved {
                Ok(authenticator) => authenticator.authenticate(header.as_deref(), mode).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(principal) => {
                    log::debug!("인증 주체: {} ({})", principal.id, principal.group);
                    req.extensions_mut().insert(principal);

                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    log::debug!("인증 실패: {}", err.code());
                    let response = err.error_response();
                    let (req, _) = req.into_parts();
                    Ok(ServiceResponse::new(req, response).map_into_right_body())
                }
            }
        })
    }
}
