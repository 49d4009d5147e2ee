//! # Todo ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /todos` - 一覧
//! - `POST /todos` - 作成
//! - `PUT|PATCH /todos/{id}` - 名前・状態の更新
//! - `DELETE /todos/{id}` - 削除
//!
//! 成功時は `{status, message, data?}` のエンベロープを返す。
//! エラー時のレスポンスは [`TodoServiceError`] を参照。
//!
//! 作成・更新のボディは型付きで抽出せず、JSON 値から `name` / `status` を
//! 寛容に読み取る。ボディが無い・JSON でない場合は空として扱うため、
//! ボディの形式が 404 やバリデーションエラーより先に拒否されることはない。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use todo_domain::todo::{Todo, TodoId, TodoStatus};
use todo_shared::ApiResponse;

use crate::{
    error::TodoServiceError,
    usecase::{CreateTodoInput, TodoUseCaseImpl, UpdateTodoInput},
};

/// 一覧の `created_at` の書式
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Todo API の共有状態
pub struct TodoState {
    pub usecase: TodoUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// Todo 作成リクエスト
#[derive(Debug, PartialEq)]
pub struct CreateTodoRequest {
    pub name: Option<String>,
}

impl CreateTodoRequest {
    pub fn from_json(body: &Value) -> Self {
        Self {
            name: body.get("name").and_then(name_from_json),
        }
    }
}

/// Todo 更新リクエスト
#[derive(Debug, PartialEq)]
pub struct UpdateTodoRequest {
    pub name:   Option<String>,
    pub status: Option<TodoStatus>,
}

impl UpdateTodoRequest {
    pub fn from_json(body: &Value) -> Self {
        Self {
            name:   body.get("name").and_then(name_from_json),
            status: body.get("status").and_then(status_from_json),
        }
    }
}

/// 抽出結果からボディの JSON 値を取り出す。解釈できなければ `null`。
fn request_body(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "ボディを JSON として解釈できないため空として扱います");
            Value::Null
        }
    }
}

/// 文字列はそのまま、数値は文字列化する。それ以外は未入力。
fn name_from_json(value: &Value) -> Option<String> {
    match value {
        Value::String(name) => Some(name.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// `status` を読み取る
///
/// 状態名に加え、列の真偽値表現（`true`/`false`, `1`/`0`）を受け付ける。
/// 解釈できない値は検証エラーにせず未設定として書き込む。
fn status_from_json(value: &Value) -> Option<TodoStatus> {
    match value {
        Value::Bool(completed) => Some(TodoStatus::from_completed(*completed)),
        Value::Number(number) => match number.as_i64() {
            Some(0) => Some(TodoStatus::Created),
            Some(1) => Some(TodoStatus::Completed),
            _ => None,
        },
        Value::String(raw) => match raw.as_str() {
            "0" | "false" => Some(TodoStatus::Created),
            "1" | "true" => Some(TodoStatus::Completed),
            other => other.parse().ok(),
        },
        _ => None,
    }
}

/// 一覧の要素（`id` は含めない）
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TodoDto {
    pub name:       String,
    pub status:     Option<TodoStatus>,
    pub created_at: String,
}

impl From<&Todo> for TodoDto {
    fn from(todo: &Todo) -> Self {
        Self {
            name:       todo.name().as_str().to_string(),
            status:     todo.status(),
            created_at: todo.created_at().format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

/// パスの ID を解釈する。整数でなければ存在しない Todo と同じ扱い。
fn parse_todo_id(raw: &str) -> Result<TodoId, TodoServiceError> {
    raw.parse().map_err(|_| TodoServiceError::NotFound)
}

fn success(message: &str) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::without_data(StatusCode::OK.as_u16(), message)),
    )
}

// --- ハンドラ ---

/// GET /todos
///
/// 0 件の場合は `data` キーを含めない。
#[tracing::instrument(skip_all)]
pub async fn list_todos(
    State(state): State<Arc<TodoState>>,
) -> Result<impl IntoResponse, TodoServiceError> {
    let todos = state.usecase.list_todos().await?;

    if todos.is_empty() {
        return Ok(success("data empty").into_response());
    }

    let items: Vec<TodoDto> = todos.iter().map(TodoDto::from).collect();
    let response = ApiResponse::with_data(StatusCode::OK.as_u16(), "list todo", items);
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// POST /todos
#[tracing::instrument(skip_all)]
pub async fn create_todo(
    State(state): State<Arc<TodoState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, TodoServiceError> {
    let req = CreateTodoRequest::from_json(&request_body(body));
    let input = CreateTodoInput { name: req.name };

    let todo = state.usecase.create_todo(input).await?;
    tracing::debug!(id = %todo.id(), "Todo を作成しました");

    Ok(success("Success add todo"))
}

/// PUT|PATCH /todos/{id}
///
/// ## レスポンス
///
/// - `200 OK`: 更新成功、またはバリデーションエラー（エラーマップ）
/// - `404 Not Found`: Todo が見つからない
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update_todo(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, TodoServiceError> {
    let req = UpdateTodoRequest::from_json(&request_body(body));
    let input = UpdateTodoInput {
        id:     parse_todo_id(&id)?,
        name:   req.name,
        status: req.status,
    };

    state.usecase.update_todo(input).await?;

    Ok(success("Success update todo"))
}

/// DELETE /todos/{id}
#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete_todo(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, TodoServiceError> {
    let id = parse_todo_id(&id)?;

    state.usecase.delete_todo(id).await?;

    Ok(success("Success delete todo"))
}
