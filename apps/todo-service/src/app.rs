//! # アプリケーション構築
//!
//! State を受け取り、ルーターを構築する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{Router, routing::get};
use todo_shared::observability::make_request_span;
use tower_http::trace::TraceLayer;

use crate::handler::{
    ReadinessState,
    TodoState,
    create_todo,
    delete_todo,
    health_check,
    list_todos,
    readiness_check,
    update_todo,
};

/// Todo API のルーター
///
/// ヘルスチェックを含まないため、DB なしのテストでも使える。
pub fn todo_routes(todo_state: Arc<TodoState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            axum::routing::put(update_todo)
                .patch(update_todo)
                .delete(delete_todo),
        )
        .with_state(todo_state)
}

/// 全ルートとトレーシングを組み込んだアプリケーションを構築する
pub fn build_app(todo_state: Arc<TodoState>, readiness_state: Arc<ReadinessState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(todo_routes(todo_state))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
}
