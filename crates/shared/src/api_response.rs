//! # API レスポンスエンベロープ
//!
//! 成功レスポンスとハンドリング済みのエラーレスポンスで共通の
//! `{ "status": u16, "message": String, "data"?: T }` 形式を提供する。
//!
//! `status` には HTTP ステータスコードをそのまま入れる。
//! `data` は値がある場合のみ出力し、`null` としては出力しない。
//!
//! バリデーションエラーはこの形式で包まずに返す（`todo_domain::ValidationErrors` 参照）。

use serde::{Deserialize, Serialize};

/// レスポンスエンベロープ
///
/// ## 使用例
///
/// ```
/// use todo_shared::ApiResponse;
///
/// let response = ApiResponse::<()>::without_data(404, "Todo not found");
/// assert_eq!(response.status, 404);
/// assert!(response.data.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status:  u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data:    Option<T>,
}

impl<T> ApiResponse<T> {
    /// `data` 付きのレスポンスを作成する
    pub fn with_data(status: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            status,
            message: message.into(),
            data: Some(data),
        }
    }

    /// `data` なしのレスポンスを作成する
    pub fn without_data(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_dataなしのときdataキーを出力しない() {
        let response = ApiResponse::<()>::without_data(200, "data empty");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "status": 200, "message": "data empty" })
        );
    }

    #[test]
    fn test_dataありのときdataキーを出力する() {
        let response = ApiResponse::with_data(200, "list todo", vec!["a", "b"]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "status": 200, "message": "list todo", "data": ["a", "b"] })
        );
    }

    #[test]
    fn test_dataキーのないjsonをデシリアライズできる() {
        let json = r#"{"status": 500, "message": "Error get data"}"#;
        let response: ApiResponse<Vec<String>> = serde_json::from_str(json).unwrap();

        assert_eq!(response.status, 500);
        assert_eq!(response.message, "Error get data");
        assert!(response.data.is_none());
    }
}
