//! # Todo API 共有ユーティリティ
//!
//! レスポンスエンベロープ、ヘルスチェックのレスポンス型、トレーシング初期化を提供する。
//! ビジネスロジックは含めない。

pub mod api_response;
pub mod health;
pub mod observability;

pub use api_response::ApiResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
