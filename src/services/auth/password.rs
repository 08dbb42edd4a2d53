use std::sync::Arc;

use actix_web::rt::task::spawn_blocking;
use once_cell::sync::OnceCell;

use crate::config::PasswordConfig;
use crate::core::errors::{AppResult, ErrorContext};

const TIMING_PLACEHOLDER: &str = "timing-equalizer";

/// bcrypt 해싱/검증
///
/// bcrypt는 CPU를 오래 점유하므로 블로킹 풀에서 실행합니다.
/// 존재하지 않는 계정에 대해서도 같은 cost의 더미 해시를 검증하여
/// 응답 시간으로 계정 존재 여부가 드러나지 않게 합니다.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    timing_hash: Arc<OnceCell<String>>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            timing_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(PasswordConfig::bcrypt_cost())
    }

    pub async fn hash(&self, secret: String) -> AppResult<String> {
        let cost = self.cost;
        spawn_blocking(move || bcrypt::hash(secret, cost))
            .await
            .context("비밀번호 해싱 작업 실패")?
            .context("비밀번호 해싱 실패")
    }

    /// 비밀번호가 저장된 해시와 일치하는지 확인합니다.
    ///
    /// `stored`가 `None`(계정 없음)이거나 해시 형식이 깨진 경우 `false`를 반환합니다.
    pub async fn verify(&self, secret: String, stored: Option<String>) -> AppResult<bool> {
        let cost = self.cost;
        let timing_hash = self.timing_hash.clone();

        spawn_blocking(move || match stored {
            Some(hash) => bcrypt::verify(secret, &hash).unwrap_or(false),
            None => {
                if let Ok(dummy) =
                    timing_hash.get_or_try_init(|| bcrypt::hash(TIMING_PLACEHOLDER, cost))
                {
                    let _ = bcrypt::verify(secret, dummy);
                }
                false
            }
        })
        .await
        .context("비밀번호 검증 작업 실패")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_hash_then_verify() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("correct horse".to_string()).await.unwrap();

        assert!(hasher.verify("correct horse".to_string(), Some(hash.clone())).await.unwrap());
        assert!(!hasher.verify("wrong".to_string(), Some(hash)).await.unwrap());
    }

    #[actix_web::test]
    async fn test_missing_or_broken_hash_is_false() {
        let hasher = PasswordHasher::new(4);

        assert!(!hasher.verify(TIMING_PLACEHOLDER.to_string(), None).await.unwrap());
        assert!(!hasher
            .verify("anything".to_string(), Some("not-a-bcrypt-hash".to_string()))
            .await
            .unwrap());
    }
}
