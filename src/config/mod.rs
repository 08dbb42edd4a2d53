//! # Configuration Module
//!
//! 환경 변수 기반 설정을 제공합니다. 각 설정은 필드 없는 구조체의 연관 함수로
//! 노출되며, 호출 시점에 환경 변수를 읽습니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 저장소, Redis, 아웃박스, 속도 제한
//! - [`auth_config`] - JWT 서명 키와 토큰 수명, 권한 테이블 파일
//!
//! ## 프로필
//!
//! `main`은 `PROFILE` 값에 따라 `.env.dev` / `.env.prod` / `.env`를 먼저 로드합니다.
//!
//! ```bash
//! export ENVIRONMENT="production"
//! export JWT_SECRET="your-super-secret-key"   # 운영 환경 필수
//! export MONGODB_URI="mongodb://localhost:27017/?replicaSet=rs0"
//! export PERMISSIONS_FILE="./permissions.json" # 선택
//! ```

pub mod auth_config;
pub mod data_config;

pub use auth_config::*;
pub use data_config::*;
