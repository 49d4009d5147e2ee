//! # Todo Service 設定
//!
//! 環境変数から Todo Service の設定を読み込む。

use std::{env, net::SocketAddr};

use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{name} が設定されていません")]
    Missing { name: &'static str },

    /// 環境変数の値が不正
    #[error("{name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Todo Service の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// データベース接続 URL
    pub database_url: String,
    /// 接続プールの最大接続数
    pub database_max_connections: u32,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

impl TodoConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 環境変数を書き換えずにテストするために分離している。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: lookup("TODO_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("TODO_PORT", lookup("TODO_PORT"), DEFAULT_PORT)?,
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing {
                name: "DATABASE_URL",
            })?,
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                lookup("DATABASE_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            )?,
        })
    }

    /// バインドするソケットアドレス
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = format!("{}:{}", self.host, self.port);
        value
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: "TODO_HOST",
                value,
            })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
