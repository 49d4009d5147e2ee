//! # リポジトリ
//!
//! ドメインエンティティの永続化インターフェースと PostgreSQL 実装。

pub mod todo_repository;

pub use todo_repository::{PostgresTodoRepository, TodoRepository};
