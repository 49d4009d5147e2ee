//! # Todo
//!
//! Todo リストの唯一のエンティティと、その名前に対するバリデーションルール。
//!
//! ## 名前のルール
//!
//! | ルール | 条件 | メッセージ |
//! |--------|------|------------|
//! | required | 前後の空白を除いて空でない | `Name cannot be empty!` |
//! | min | 3 文字以上 | `Name at least 3 characters!` |
//! | max | 20 文字以下 | `Name up to 20 characters!` |
//! | unique | 既存の Todo と重複しない | `Name already exists` |
//!
//! required を満たさない場合は他のルールを評価しない。
//! それ以外は min / max / unique をすべて評価し、失敗したルールのメッセージを
//! この順で積む。
//!
//! ## 使用例
//!
//! ```rust
//! use todo_domain::todo::validate_todo_name;
//!
//! let errors = validate_todo_name(Some("ab"), false).unwrap_err();
//! assert_eq!(errors.messages("name"), ["Name at least 3 characters!"]);
//! ```

use std::{cmp::Ordering, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, ValidationErrors};

/// バリデーションエラーのフィールド名
pub const NAME_FIELD: &str = "name";

/// 名前の最小文字数
pub const TODO_NAME_MIN_LENGTH: usize = 3;

/// 名前の最大文字数（DB: `VARCHAR(20)`）
pub const TODO_NAME_MAX_LENGTH: usize = 20;

pub const NAME_REQUIRED_MESSAGE: &str = "Name cannot be empty!";
pub const NAME_TOO_SHORT_MESSAGE: &str = "Name at least 3 characters!";
pub const NAME_TOO_LONG_MESSAGE: &str = "Name up to 20 characters!";
pub const NAME_TAKEN_MESSAGE: &str = "Name already exists";

// =========================================================================
// TodoId
// =========================================================================

/// Todo の識別子
///
/// ストレージ（`BIGSERIAL`）が採番する整数。アプリケーションからは生成しない。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl FromStr for TodoId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidTodoId(s.to_string()))
    }
}

// =========================================================================
// TodoName
// =========================================================================

/// Todo の名前（値オブジェクト）
///
/// # 不変条件
///
/// - 前後に空白を含まない
/// - 3 文字以上 20 文字以下
///
/// 一意性はストレージ全体に対する制約なので、この型では保証しない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoName(String);

impl TodoName {
    /// DB から読み込んだ値で復元する
    ///
    /// 長さは `VARCHAR(20)` と書き込み時のバリデーションで担保されているため再検証しない。
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TodoName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 入力された名前を正規化する
///
/// 前後の空白を取り除き、空になった場合は未入力（`None`）として扱う。
pub fn normalize_todo_name(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// 名前のバリデーションを行う
///
/// `raw` は正規化前の入力値。`name_taken` は正規化後の名前が既存の Todo と
/// 重複しているかどうかで、呼び出し側がストレージに問い合わせた結果を渡す。
/// 未入力の場合 `name_taken` は参照されない。
pub fn validate_todo_name(
    raw: Option<&str>,
    name_taken: bool,
) -> Result<TodoName, ValidationErrors> {
    let Some(name) = normalize_todo_name(raw) else {
        return Err(ValidationErrors::single(NAME_FIELD, NAME_REQUIRED_MESSAGE));
    };

    let mut errors = ValidationErrors::new();
    let length = name.chars().count();

    if length < TODO_NAME_MIN_LENGTH {
        errors.add(NAME_FIELD, NAME_TOO_SHORT_MESSAGE);
    }
    if length > TODO_NAME_MAX_LENGTH {
        errors.add(NAME_FIELD, NAME_TOO_LONG_MESSAGE);
    }
    if name_taken {
        errors.add(NAME_FIELD, NAME_TAKEN_MESSAGE);
    }

    if errors.is_empty() {
        Ok(TodoName(name))
    } else {
        Err(errors)
    }
}

// =========================================================================
// TodoStatus
// =========================================================================

/// Todo の状態
///
/// DB では `BOOLEAN` 列（`FALSE` = created, `TRUE` = completed）として保存する。
/// 遷移は更新リクエストによる明示的な切り替えのみ。
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TodoStatus {
    /// 作成直後（未完了）
    #[default]
    Created,
    /// 完了
    Completed,
}

impl TodoStatus {
    /// DB の `BOOLEAN` 値から復元する
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            Self::Completed
        } else {
            Self::Created
        }
    }

    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

// =========================================================================
// Todo
// =========================================================================

/// 新規作成する Todo
///
/// ID はストレージが採番するため持たない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub name:   TodoName,
    pub status: TodoStatus,
    pub now:    DateTime<Utc>,
}

impl NewTodo {
    /// 初期状態（[`TodoStatus::Created`]）の Todo を作成する
    pub fn new(name: TodoName, now: DateTime<Utc>) -> Self {
        Self {
            name,
            status: TodoStatus::default(),
            now,
        }
    }
}

/// Todo エンティティ
///
/// `status` が `None` になるのは、更新リクエストで status が省略された場合のみ。
/// 更新時の status は検証せずそのまま書き込む。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id:         TodoId,
    name:       TodoName,
    status:     Option<TodoStatus>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Todo {
    /// 永続化済みの値から Todo を復元する
    pub fn from_db(
        id: TodoId,
        name: TodoName,
        status: Option<TodoStatus>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            status,
            created_at,
            updated_at,
        }
    }

    /// 名前と状態を書き換えた Todo を返す
    ///
    /// 名前が変わっていなくても両方を上書きし、`updated_at` を進める。
    pub fn update(self, name: TodoName, status: Option<TodoStatus>, now: DateTime<Utc>) -> Self {
        Self {
            name,
            status,
            updated_at: now,
            ..self
        }
    }

    /// 一覧表示の並び順で比較する
    ///
    /// `status` 昇順（未設定 → created → completed）、同じ status 内では
    /// `created_at` 降順。PostgreSQL の `ORDER BY status ASC NULLS FIRST,
    /// created_at DESC` と同じ結果になる。
    pub fn cmp_for_listing(&self, other: &Self) -> Ordering {
        self.status
            .cmp(&other.status)
            .then_with(|| other.created_at.cmp(&self.created_at))
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn name(&self) -> &TodoName {
        &self.name
    }

    pub fn status(&self) -> Option<TodoStatus> {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
