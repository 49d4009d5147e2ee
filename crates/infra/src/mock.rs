//! # テスト用モックリポジトリ
//!
//! ハンドラ・ユースケースのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! todo-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! PostgreSQL 実装と同じく、名前の重複は一意制約違反として返し、
//! 一覧は [`Todo::cmp_for_listing`] の順で返す。
//! [`MockTodoRepository::fail_storage`] を呼ぶと以降の全操作がストレージ障害になる。

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicBool, AtomicI64, Ordering},
};

use async_trait::async_trait;
use todo_domain::todo::{NewTodo, Todo, TodoId};

use crate::{error::InfraError, repository::TodoRepository};

/// 一意制約名（マイグレーションの `UNIQUE` 制約と揃える）
const NAME_UNIQUE_CONSTRAINT: &str = "todos_name_key";

/// 障害注入時のエラーメッセージ
pub const SIMULATED_FAILURE_MESSAGE: &str = "simulated storage failure: connection reset";

#[derive(Clone)]
pub struct MockTodoRepository {
    todos:   Arc<Mutex<Vec<Todo>>>,
    next_id: Arc<AtomicI64>,
    failing: Arc<AtomicBool>,
}

impl Default for MockTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTodoRepository {
    pub fn new() -> Self {
        Self::with_todos(Vec::new())
    }

    /// 既存データ入りで作成する（採番は既存 ID の最大値の次から）
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos.iter().map(|t| t.id().as_i64()).max().unwrap_or(0) + 1;
        Self {
            todos:   Arc::new(Mutex::new(todos)),
            next_id: Arc::new(AtomicI64::new(next_id)),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 以降の全操作をストレージ障害にする
    pub fn fail_storage(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// 現在の保存内容（挿入順）
    pub fn snapshot(&self) -> Vec<Todo> {
        self.todos.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<(), InfraError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(InfraError::unexpected(SIMULATED_FAILURE_MESSAGE));
        }
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for MockTodoRepository {
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError> {
        self.check_available()?;
        let mut todos = self.todos.lock().unwrap().clone();
        todos.sort_by(Todo::cmp_for_listing);
        Ok(todos)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError> {
        self.check_available()?;
        Ok(self
            .todos
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id() == id)
            .cloned())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, InfraError> {
        self.check_available()?;
        Ok(self
            .todos
            .lock()
            .unwrap()
            .iter()
            .any(|t| t.name().as_str() == name))
    }

    async fn insert(&self, todo: &NewTodo) -> Result<Todo, InfraError> {
        self.check_available()?;
        let mut todos = self.todos.lock().unwrap();
        if todos.iter().any(|t| t.name() == &todo.name) {
            return Err(InfraError::unique_violation(NAME_UNIQUE_CONSTRAINT));
        }

        let id = TodoId::from_i64(self.next_id.fetch_add(1, Ordering::SeqCst));
        let inserted = Todo::from_db(
            id,
            todo.name.clone(),
            Some(todo.status),
            todo.now,
            todo.now,
        );
        todos.push(inserted.clone());
        Ok(inserted)
    }

    async fn update(&self, todo: &Todo) -> Result<(), InfraError> {
        self.check_available()?;
        let mut todos = self.todos.lock().unwrap();
        if todos
            .iter()
            .any(|t| t.id() != todo.id() && t.name() == todo.name())
        {
            return Err(InfraError::unique_violation(NAME_UNIQUE_CONSTRAINT));
        }
        if let Some(pos) = todos.iter().position(|t| t.id() == todo.id()) {
            todos[pos] = todo.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: TodoId) -> Result<(), InfraError> {
        self.check_available()?;
        self.todos.lock().unwrap().retain(|t| t.id() != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use todo_domain::todo::{TodoName, TodoStatus};

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn new_todo(name: &str) -> NewTodo {
        NewTodo::new(TodoName::from_db(name.to_string()), now())
    }

    #[tokio::test]
    async fn test_insertは1から順に採番する() {
        let sut = MockTodoRepository::new();

        let first = sut.insert(&new_todo("first")).await.unwrap();
        let second = sut.insert(&new_todo("second")).await.unwrap();

        assert_eq!(first.id(), TodoId::from_i64(1));
        assert_eq!(second.id(), TodoId::from_i64(2));
        assert_eq!(first.status(), Some(TodoStatus::Created));
    }

    #[tokio::test]
    async fn test_insertで名前が重複すると一意制約違反になる() {
        let sut = MockTodoRepository::new();
        sut.insert(&new_todo("Groceries")).await.unwrap();

        let err = sut.insert(&new_todo("Groceries")).await.unwrap_err();

        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_fail_storage後は全操作が失敗する() {
        let sut = MockTodoRepository::new();
        sut.fail_storage();

        assert!(sut.find_all().await.is_err());
        assert!(sut.find_by_id(TodoId::from_i64(1)).await.is_err());
        assert!(sut.exists_by_name("x").await.is_err());
        assert!(sut.insert(&new_todo("Groceries")).await.is_err());
        assert!(sut.delete(TodoId::from_i64(1)).await.is_err());
    }
}
