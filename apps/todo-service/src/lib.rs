//! # Todo Service ライブラリ
//!
//! Todo API のルーター構築・ハンドラ・ユースケースを公開する。
//! `main.rs` はインフラ初期化とサーバー起動のみを担当する。

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
