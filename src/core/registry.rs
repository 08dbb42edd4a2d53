//! # Service Registry
//!
//! 부트스트랩 단계에서 조립한 서비스 인스턴스를 타입별로 보관하는 전역 레지스트리입니다.
//! 핸들러와 미들웨어는 actix의 팩토리 클로저 밖에서 실행되므로, 요청 시점에
//! 여기서 필요한 서비스를 꺼내 씁니다.
//!
//! ## 생명주기
//!
//! ```text
//! main()
//!  ├── Database / RedisClient 연결
//!  ├── core::container::register_services()  ← 모든 set() 호출은 여기서 한 번
//!  └── HttpServer::run()                      ← 이후에는 get()만 호출
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::core::registry::ServiceLocator;
//!
//! ServiceLocator::register(Arc::new(token_service));
//!
//! // 핸들러
//! let token_service = TokenService::instance()?;
//! ```
//!
//! 생성자가 설정 로드나 저장소 연결처럼 실패할 수 있는 입력을 받으므로,
//! 인스턴스는 지연 생성하지 않고 `core::container`에서 미리 만들어 등록합니다.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::core::errors::{AppError, AppResult};

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

/// 레지스트리에 하나씩 보관되는 서비스
pub trait Service: Send + Sync + Sized + 'static {
    /// 로그에 쓰이는 서비스 이름
    const NAME: &'static str;

    /// 등록된 인스턴스를 가져옵니다.
    fn instance() -> AppResult<Arc<Self>> {
        ServiceLocator::get::<Self>()
    }
}

/// 타입 기반 싱글톤 컨테이너
///
/// `TypeId`를 키로 하여 타입당 하나의 `Arc<T>`를 보관합니다.
/// 제네릭 타입은 인자별로 서로 다른 키가 되므로
/// `EntityUseCase<Post>`와 `EntityUseCase<Tag>`는 별도로 등록됩니다.
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
        }
    }

    pub fn register<T: Service>(instance: Arc<T>) {
        Self::set(instance);
        log::info!("📦 {} 서비스 등록", T::NAME);
    }

    /// 인스턴스를 등록합니다. 같은 타입이 이미 있으면 교체합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_name = std::any::type_name::<T>();
        match LOCATOR.instances.write() {
            Ok(mut instances) => {
                instances.insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
                log::debug!("📦 Registered: {}", type_name);
            }
            Err(_) => log::error!("레지스트리 잠금 실패, 등록 건너뜀: {}", type_name),
        }
    }

    /// 등록된 인스턴스를 가져옵니다.
    ///
    /// # Errors
    ///
    /// 등록되지 않은 타입이면 `UnexpectedBehavior`. 부트스트랩 누락은
    /// 설정 오류이므로 요청 단위의 500 응답으로 드러납니다.
    pub fn get<T: 'static + Send + Sync>() -> AppResult<Arc<T>> {
        let type_name = std::any::type_name::<T>();
        let instances = LOCATOR
            .instances
            .read()
            .map_err(|_| AppError::unexpected("서비스 레지스트리 잠금 실패"))?;

        instances
            .get(&TypeId::of::<T>())
            .cloned()
            .ok_or_else(|| AppError::unexpected(format!("등록되지 않은 서비스: {}", type_name)))?
            .downcast::<T>()
            .map_err(|_| AppError::unexpected(format!("서비스 타입 불일치: {}", type_name)))
    }

    pub fn contains<T: 'static + Send + Sync>() -> bool {
        LOCATOR
            .instances
            .read()
            .map(|instances| instances.contains_key(&TypeId::of::<T>()))
            .unwrap_or(false)
    }
}
