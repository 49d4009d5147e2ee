//! # バリデーションエラー
//!
//! フィールド名 → エラーメッセージ一覧のマップ。
//! API ではエンベロープで包まずにそのまま JSON として返す:
//!
//! ```json
//! { "name": ["Name at least 3 characters!", "Name already exists"] }
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

/// フィールド単位のバリデーションエラー集合
///
/// メッセージはルールの評価順に積まれる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 単一フィールド・単一メッセージのエラーを作成する
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// フィールドにメッセージを追加する
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 指定フィールドのメッセージ一覧（エラーがなければ空スライス）
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}
