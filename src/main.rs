//! 장비 서비스 메인 애플리케이션
//!
//! MongoDB, Redis 연결을 설정하고 서비스를 조립한 뒤,
//! 아웃박스 릴레이와 HTTP 서버를 구동합니다.

use std::io;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use equipment_service_backend::broker::RedisClient;
use equipment_service_backend::config::{OutboxConfig, RateLimitConfig, ServerConfig};
use equipment_service_backend::core::container::register_services;
use equipment_service_backend::core::errors::AppError;
use equipment_service_backend::db::Database;
use equipment_service_backend::routes::configure_all_routes;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 장비 서비스 시작중...");

    info!("📡 데이터베이스 연결 중...");
    let database = Database::new().await.map_err(startup_error)?;
    let redis = RedisClient::new().await.map_err(startup_error)?;

    let relay = register_services(&database, redis)
        .await
        .map_err(startup_error)?;
    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    relay.spawn(OutboxConfig::poll_interval());

    start_http_server().await
}

fn startup_error(e: AppError) -> io::Error {
    error!("기동 실패: {:?}", e);
    io::Error::other(e.to_string())
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 미들웨어 순서(바깥 → 안): Governor → CORS → Logger → NormalizePath
async fn start_http_server() -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let rate_limit = RateLimitConfig::from_env();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit.per_second, rate_limit.burst_size
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// `RUST_LOG` 기반 로깅 초기화 (기본값: "info,actix_web=info")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

/// 프론트엔드 개발 서버와 자체 서버 Origin을 허용합니다.
fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8080")
        .allowed_origin("http://127.0.0.1:8080")
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}
