//! # Todo インフラ層
//!
//! PostgreSQL への接続と、ドメイン層のエンティティを永続化するリポジトリを提供する。
//!
//! ## 依存関係
//!
//! ```text
//! todo-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プールとマイグレーション
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリトレイトと PostgreSQL 実装
//! - `mock` - インメモリのモックリポジトリ（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use todo_infra::{db, repository::PostgresTodoRepository};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/todo", 10).await?;
//!     db::run_migrations(&pool).await?;
//!     let repository = PostgresTodoRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
