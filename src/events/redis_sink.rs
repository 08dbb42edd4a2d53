use async_trait::async_trait;

use crate::broker::RedisClient;
use crate::config::OutboxConfig;
use crate::core::errors::{AppResult, ErrorContext};
use crate::domain::models::events::DomainEvent;
use crate::events::EventSink;

/// 리소스별 Redis Stream으로 이벤트를 발행합니다.
pub struct RedisStreamSink {
    client: RedisClient,
    prefix: String,
}

impl RedisStreamSink {
    pub fn new(client: RedisClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    pub fn from_env(client: RedisClient) -> Self {
        Self::new(client, OutboxConfig::stream_prefix())
    }

    pub fn stream_for(&self, event: &DomainEvent) -> String {
        stream_name(&self.prefix, event)
    }
}

fn stream_name(prefix: &str, event: &DomainEvent) -> String {
    format!("{}:{}", prefix, event.resource)
}

#[async_trait]
impl EventSink for RedisStreamSink {
    async fn publish(&self, event: &DomainEvent) -> AppResult<()> {
        let payload = serde_json::to_string(event).context("이벤트 직렬화 실패")?;
        let stream = self.stream_for(event);

        let entry = self
            .client
            .xadd(
                &stream,
                &[
                    ("event_id", event.id.clone()),
                    ("kind", event.kind.as_str().to_string()),
                    ("entity_id", event.entity_id.clone()),
                    ("payload", payload),
                ],
            )
            .await?;

        log::debug!("이벤트 발행: {} → {} ({})", event.id, stream, entry);
        Ok(())
    }
}
