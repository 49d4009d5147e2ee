//! # Todo Service サーバー
//!
//! Todo の一覧・作成・更新・削除を提供する HTTP API。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `TODO_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `TODO_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `DATABASE_MAX_CONNECTIONS` | No | 接続プールの上限（デフォルト: `10`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,todo=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo run -p todo-service
//! ```
//!
//! 起動時にマイグレーションを適用する。

use std::sync::Arc;

use anyhow::Context;
use todo_domain::clock::SystemClock;
use todo_infra::{db, repository::PostgresTodoRepository};
use todo_service::{
    app::build_app,
    config::TodoConfig,
    handler::{ReadinessState, TodoState},
    usecase::TodoUseCaseImpl,
};
use todo_shared::observability::{self, TracingConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("todo-service");
    observability::init_tracing(&tracing_config);
    let _tracing_guard = tracing_config.root_span().entered();

    let config = TodoConfig::from_env().context("設定の読み込みに失敗しました")?;
    let addr = config.bind_addr()?;

    tracing::info!("Todo Service サーバーを起動します: {}", addr);

    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("データベース接続に失敗しました")?;
    db::run_migrations(&pool)
        .await
        .context("マイグレーションの適用に失敗しました")?;
    tracing::info!("データベースに接続しました");

    let usecase = TodoUseCaseImpl::new(
        Arc::new(PostgresTodoRepository::new(pool.clone())),
        Arc::new(SystemClock),
    );
    let todo_state = Arc::new(TodoState { usecase });
    let readiness_state = Arc::new(ReadinessState { pool });

    let app = build_app(todo_state, readiness_state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} にバインドできません"))?;
    tracing::info!("Todo Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Todo Service サーバーを停止しました");
    Ok(())
}

/// Ctrl-C または SIGTERM を待つ
///
/// シグナルハンドラを登録できなかった場合は、そのシグナルでは停止しない。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C ハンドラを登録できませんでした");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM ハンドラを登録できませんでした");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }

    tracing::info!("シャットダウンシグナルを受信しました");
}
