//! # TodoRepository
//!
//! Todo の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **狭いインターフェース**: 一覧・ID 検索・名前の存在確認・挿入・更新・削除のみ
//! - **一覧の並び順は固定**: `status` 昇順 → `created_at` 降順
//! - **ID はストレージ採番**: 挿入時に `RETURNING` で採番結果を受け取る

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use todo_domain::todo::{NewTodo, Todo, TodoId, TodoName, TodoStatus};

use crate::error::InfraError;

/// Todo リポジトリトレイト
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// 全件を一覧表示の並び順で取得する
    ///
    /// `status` 昇順（未設定 → created → completed）、同じ status 内では
    /// `created_at` 降順。
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError>;

    /// ID で Todo を検索する
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError>;

    /// 同じ名前の Todo が存在するか
    async fn exists_by_name(&self, name: &str) -> Result<bool, InfraError>;

    /// Todo を挿入し、採番された ID を含むエンティティを返す
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, InfraError>;

    /// 名前・状態・更新日時を書き換える
    async fn update(&self, todo: &Todo) -> Result<(), InfraError>;

    /// Todo を物理削除する
    async fn delete(&self, id: TodoId) -> Result<(), InfraError>;
}

/// `todos` テーブルの行
#[derive(Debug, sqlx::FromRow)]
struct TodoRow {
    id:         i64,
    name:       String,
    status:     Option<bool>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo::from_db(
            TodoId::from_i64(row.id),
            TodoName::from_db(row.name),
            row.status.map(TodoStatus::from_completed),
            row.created_at,
            row.updated_at,
        )
    }
}

/// PostgreSQL 実装の TodoRepository
#[derive(Debug, Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, name, status, created_at, updated_at
            FROM todos
            ORDER BY status ASC NULLS FIRST, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, name, status, created_at, updated_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Todo::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%name))]
    async fn exists_by_name(&self, name: &str) -> Result<bool, InfraError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM todos WHERE name = $1)
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(name = %todo.name))]
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, InfraError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            INSERT INTO todos (name, status, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, name, status, created_at, updated_at
            "#,
        )
        .bind(todo.name.as_str())
        .bind(todo.status.is_completed())
        .bind(todo.now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %todo.id()))]
    async fn update(&self, todo: &Todo) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            UPDATE todos
            SET name = $2, status = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(todo.id().as_i64())
        .bind(todo.name().as_str())
        .bind(todo.status().map(TodoStatus::is_completed))
        .bind(todo.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: TodoId) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            DELETE FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
