//! 라우트 구성
//!
//! ```text
//! GET    /health
//! POST   /api/v1/auth/login
//! POST   /api/v1/auth/refresh
//! GET    /api/v1/auth/validate
//! GET    /api/v1/auth/me                (필수 인증)
//! POST   /api/v1/{entity}               (선택 인증, 이하 동일)
//! GET    /api/v1/{entity}?limit=&offset=&<filter>
//! GET    /api/v1/{entity}/{id}
//! PUT    /api/v1/{entity}/{id}
//! DELETE /api/v1/{entity}/{id}
//! ```

use actix_web::dev::HttpServiceFactory;
use actix_web::web;
use serde_json::json;

use crate::domain::entities::{Entity, Equipment, Like, Post, Tag, User};
use crate::handlers;
use crate::middlewares::AuthMiddleware;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    configure_auth_routes(cfg);
    configure_entity_routes(cfg);
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(handlers::auth::login)
            .service(handlers::auth::refresh)
            .service(handlers::auth::validate)
            .service(
                web::resource("/me")
                    .wrap(AuthMiddleware::required())
                    .route(web::get().to(handlers::auth::me)),
            ),
    );
}

fn configure_entity_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(entity_scope::<User>("/api/v1/users"))
        .service(entity_scope::<Equipment>("/api/v1/equipment"))
        .service(entity_scope::<Post>("/api/v1/posts"))
        .service(entity_scope::<Tag>("/api/v1/tags"))
        .service(entity_scope::<Like>("/api/v1/likes"));
}

/// 엔티티 하나의 CRUD 스코프. 토큰이 없으면 `guest`로 처리됩니다.
pub fn entity_scope<E: Entity>(path: &str) -> impl HttpServiceFactory + use<E> {
    web::scope(path)
        .wrap(AuthMiddleware::optional())
        .service(
            web::resource("")
                .route(web::post().to(handlers::entities::create::<E>))
                .route(web::get().to(handlers::entities::list::<E>)),
        )
        .service(
            web::resource("/{id}")
                .route(web::get().to(handlers::entities::get::<E>))
                .route(web::put().to(handlers::entities::update::<E>))
                .route(web::delete().to(handlers::entities::delete::<E>)),
        )
}

#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "equipment_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "events": "Redis Streams (outbox)",
            "authentication": "JWT (HS256)"
        }
    }))
}
