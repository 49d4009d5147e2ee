//! # ユースケース層
//!
//! Todo Service のビジネスロジック（入力検証と永続化の呼び出し）を実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリと時刻プロバイダを `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは HTTP の入出力変換のみを行い、判断はユースケースに集約

pub mod todo;

pub use todo::{CreateTodoInput, TodoUseCaseImpl, UpdateTodoInput};
