//! # ドメイン層エラー定義
//!
//! 入力値の検証失敗（フィールド単位のメッセージ）は [`ValidationErrors`] で表現し、
//! それ以外のドメイン例外をこのモジュールの [`DomainError`] で表現する。
//!
//! [`ValidationErrors`]: crate::ValidationErrors

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Todo ID として解釈できない値
    ///
    /// パスパラメータなど外部から渡された文字列が整数でない場合に使用する。
    /// API 層では「存在しない Todo」と同じ扱いになる。
    #[error("不正な Todo ID です: {0}")]
    InvalidTodoId(String),
}
