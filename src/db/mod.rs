//! # Database Module
//!
//! MongoDB 연결과 저장소 호출 공통 유틸리티를 제공합니다.
//!
//! 다중 문서 트랜잭션을 사용하므로 MongoDB는 레플리카 셋으로 구성되어야 합니다.
//! 단일 노드 개발 환경에서도 `--replSet rs0`으로 기동한 뒤 `rs.initiate()`가 필요합니다.

use std::fmt::Display;
use std::future::IntoFuture;
use std::time::Duration;

use log::info;
use mongodb::{options::ClientOptions, Client};

use crate::config::StorageConfig;
use crate::core::errors::{AppError, AppResult, ErrorContext};

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    pub async fn new() -> AppResult<Self> {
        let mongodb_uri = StorageConfig::mongodb_uri();
        let database_name = StorageConfig::database_name();

        let mut client_options = ClientOptions::parse(&mongodb_uri)
            .await
            .context("MongoDB URI 파싱 실패")?;

        // 애플리케이션 이름 설정 (모니터링 및 로깅에 유용)
        client_options.app_name = Some("equipment_service".to_string());

        let client = Client::with_options(client_options).context("MongoDB 클라이언트 생성 실패")?;

        // 연결 테스트
        client
            .database(&database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await
            .context("MongoDB ping 실패")?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}

/// 저장소 호출 하나를 고정된 기한 안에 실행합니다.
///
/// 기한 초과와 드라이버 에러는 모두 `UnexpectedBehavior`가 됩니다.
/// 기한이 지나면 진행 중이던 future는 drop되어 취소됩니다.
pub async fn with_deadline<T, E, F>(limit: Duration, operation: F) -> AppResult<T>
where
    F: IntoFuture<Output = Result<T, E>>,
    E: Display,
{
    match actix_web::rt::time::timeout(limit, operation.into_future()).await {
        Ok(result) => result.map_err(AppError::unexpected),
        Err(_) => Err(AppError::unexpected(format!(
            "저장소 호출이 {}ms 안에 끝나지 않았습니다",
            limit.as_millis()
        ))),
    }
}
