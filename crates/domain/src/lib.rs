//! # Todo ドメイン層
//!
//! Todo API のドメインモデルとバリデーションルールを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: [`todo::Todo`] が唯一の集約
//! - **値オブジェクト**: [`todo::TodoId`], [`todo::TodoName`], [`todo::TodoStatus`]
//! - **純粋なバリデーション**: 入力検証は I/O を持たない関数として提供し、
//!   一意性チェックの結果だけを呼び出し側から受け取る
//!
//! ## 依存関係の方向
//!
//! ```text
//! todo-service → infra → domain
//!      ↘                   ↑
//!        shared ───────────┘（依存なし）
//! ```
//!
//! ドメイン層は DB や HTTP に一切依存しない。
//!
//! ## 使用例
//!
//! ```rust
//! use todo_domain::todo::{TodoStatus, validate_todo_name};
//!
//! let name = validate_todo_name(Some("Groceries"), false).unwrap();
//! assert_eq!(name.as_str(), "Groceries");
//! assert_eq!(TodoStatus::default(), TodoStatus::Created);
//! ```

pub mod clock;
pub mod error;
pub mod todo;
pub mod validation;

pub use error::DomainError;
pub use validation::ValidationErrors;
