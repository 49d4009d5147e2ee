//! # Todo Service エラー定義
//!
//! ユースケースで発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | エラー | HTTP ステータス | ボディ |
//! |--------|----------------|--------|
//! | `Validation` | 200 | フィールド → メッセージ一覧（エンベロープなし） |
//! | `NotFound` | 404 | `{"status":404,"message":"Todo not found"}` |
//! | `Storage` | 500 | `{"status":500,"message":"<操作ごとの固定文言>"}` |
//!
//! ストレージ障害の詳細はログにのみ出力し、レスポンスには含めない。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todo_domain::ValidationErrors;
use todo_infra::InfraError;
use todo_shared::ApiResponse;

/// バリデーションエラー時の HTTP ステータス
///
/// 既存クライアントが 200 + エラーマップで判定しているため 422 にしていない。
pub const VALIDATION_ERROR_STATUS: StatusCode = StatusCode::OK;

pub const NOT_FOUND_MESSAGE: &str = "Todo not found";

/// Todo に対する操作
///
/// ストレージ障害時のレスポンス文言とログの接頭辞を決める。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoOperation {
    List,
    Create,
    Update,
    Delete,
}

impl TodoOperation {
    /// ストレージ障害時にクライアントへ返す固定文言
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Error get data",
            Self::Create => "Error add todo",
            Self::Update => "Error update todo",
            Self::Delete => "Error delete todo",
        }
    }
}

/// Todo Service で発生するエラー
#[derive(Debug, Error)]
pub enum TodoServiceError {
    /// 入力値の検証失敗
    #[error("バリデーションエラー: {0}")]
    Validation(ValidationErrors),

    /// 指定 ID の Todo が存在しない
    #[error("Todo が見つかりません")]
    NotFound,

    /// ストレージ障害
    #[error("{}: {source}", .operation.failure_message())]
    Storage {
        operation: TodoOperation,
        #[source]
        source:    InfraError,
    },
}

impl TodoServiceError {
    /// `map_err` 用: ストレージ障害に変換するクロージャを返す
    pub fn storage(operation: TodoOperation) -> impl FnOnce(InfraError) -> Self {
        move |source| Self::Storage { operation, source }
    }
}

impl IntoResponse for TodoServiceError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (VALIDATION_ERROR_STATUS, Json(errors)).into_response(),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::without_data(
                    StatusCode::NOT_FOUND.as_u16(),
                    NOT_FOUND_MESSAGE,
                )),
            )
                .into_response(),
            Self::Storage { operation, source } => {
                let message = operation.failure_message();
                tracing::error!(
                    span_trace = %source.span_trace(),
                    "{}: {}",
                    message,
                    source
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::without_data(
                        StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                        message,
                    )),
                )
                    .into_response()
            }
        }
    }
}
