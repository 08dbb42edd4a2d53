//! 엔티티 공통 CRUD 핸들러
//!
//! 라우트 매크로는 제네릭 함수에 붙일 수 없으므로 `routes::entity_scope`에서
//! `web::resource(..).route(web::post().to(create::<E>))` 형태로 등록합니다.
//! 모든 핸들러는 인증 미들웨어가 넣어 둔 `Principal`을 받아 `EntityUseCase`에 넘깁니다.

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::core::registry::Service;
use crate::domain::dto::ListResponse;
use crate::domain::entities::{Entity, Page};
use crate::domain::models::auth::Principal;
use crate::services::entities::EntityUseCase;

pub async fn create<E: Entity>(
    principal: Principal,
    payload: web::Json<E::Create>,
) -> Result<HttpResponse, AppError> {
    let use_case = EntityUseCase::<E>::instance()?;
    let entity = use_case.create(&principal, payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(E::Response::from(entity)))
}

pub async fn get<E: Entity>(
    principal: Principal,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let use_case = EntityUseCase::<E>::instance()?;
    let entity = use_case.get(&principal, &path).await?;

    Ok(HttpResponse::Ok().json(E::Response::from(entity)))
}

pub async fn list<E: Entity>(
    principal: Principal,
    page: web::Query<Page>,
    filter: web::Query<E::Filter>,
) -> Result<HttpResponse, AppError> {
    page.validate()?;

    let use_case = EntityUseCase::<E>::instance()?;
    let (items, total) = use_case.list(&principal, &filter, *page).await?;

    Ok(HttpResponse::Ok().json(ListResponse {
        items: items.into_iter().map(E::Response::from).collect::<Vec<_>>(),
        total,
    }))
}

pub async fn update<E: Entity>(
    principal: Principal,
    path: web::Path<String>,
    payload: web::Json<E::Update>,
) -> Result<HttpResponse, AppError> {
    let use_case = EntityUseCase::<E>::instance()?;
    let entity = use_case
        .update(&principal, &path, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(E::Response::from(entity)))
}

pub async fn delete<E: Entity>(
    principal: Principal,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let use_case = EntityUseCase::<E>::instance()?;
    use_case.delete(&principal, &path).await?;

    Ok(HttpResponse::NoContent().finish())
}
