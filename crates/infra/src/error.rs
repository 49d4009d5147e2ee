//! # インフラ層エラー定義
//!
//! データベースとの通信で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターン:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! `From<sqlx::Error>` や convenience constructor でエラーを生成すると、
//! その時点のスパン情報（どのリポジトリメソッドから来たか）が記録される。
//! `SpanTrace` の収集には subscriber に `tracing_error::ErrorLayer` が必要。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// データベースエラー
    ///
    /// 接続エラー、クエリ実行失敗など。一意制約違反は [`UniqueViolation`] に分類する。
    ///
    /// [`UniqueViolation`]: InfraErrorKind::UniqueViolation
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// 一意制約違反
    ///
    /// アプリケーション側の重複チェックをすり抜けた同時書き込みで発生する。
    #[error("一意制約違反: {constraint}")]
    UniqueViolation {
        /// 違反した制約名（例: `"todos_name_key"`）
        constraint: String,
    },

    /// 予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 一意制約違反かどうか
    pub fn is_unique_violation(&self) -> bool {
        matches!(self.kind, InfraErrorKind::UniqueViolation { .. })
    }

    /// 一意制約違反エラーを生成する
    pub fn unique_violation(constraint: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::UniqueViolation {
                constraint: constraint.into(),
            },
            span_trace: SpanTrace::capture(),
        }
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        let unique_constraint = source
            .as_database_error()
            .filter(|db_err| db_err.is_unique_violation())
            .map(|db_err| db_err.constraint().unwrap_or_default().to_string());

        let kind = match unique_constraint {
            Some(constraint) => InfraErrorKind::UniqueViolation { constraint },
            None => InfraErrorKind::Database(source),
        };

        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    /// ErrorLayer 付き subscriber の下で実行する
    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    #[test]
    fn test_from_sqlx_errorでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("find_by_id", id = 42);
            let _enter = span.enter();

            let err: InfraError = sqlx::Error::RowNotFound.into();

            assert!(matches!(err.kind(), InfraErrorKind::Database(_)));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("find_by_id"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }

    #[test]
    fn test_接続系のsqlx_errorは一意制約違反に分類されない() {
        let err: InfraError = sqlx::Error::PoolTimedOut.into();

        assert!(!err.is_unique_violation());
        assert!(matches!(err.kind(), InfraErrorKind::Database(_)));
    }

    #[test]
    fn test_unique_violationは制約名を保持する() {
        let err = InfraError::unique_violation("todos_name_key");

        assert!(err.is_unique_violation());
        assert_eq!(err.to_string(), "一意制約違反: todos_name_key");
    }

    #[test]
    fn test_unexpectedのdisplayはkindのメッセージになる() {
        let err = InfraError::unexpected("接続が切断されました");

        assert_eq!(err.to_string(), "予期しないエラー: 接続が切断されました");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_databaseのsourceは元のsqlx_errorを返す() {
        let err: InfraError = sqlx::Error::RowNotFound.into();

        assert!(std::error::Error::source(&err).is_some());
    }
}
