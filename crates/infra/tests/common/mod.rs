//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するエンティティ生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use todo_domain::todo::{NewTodo, TodoName};

/// テスト用の固定日時
pub fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// 固定日時から指定秒数進めた日時
pub fn test_now_plus(seconds: i64) -> DateTime<Utc> {
    test_now() + Duration::seconds(seconds)
}

/// 初期状態の NewTodo を作成
pub fn new_todo(name: &str, now: DateTime<Utc>) -> NewTodo {
    NewTodo::new(TodoName::from_db(name.to_string()), now)
}
