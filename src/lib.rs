//! FaceScan CLI
//!
//! 共通ライブラリのセッションを、ローカル画像とHTTPクライアントで動かす。

pub mod cli;
pub mod client;
pub mod config;
pub mod device;
pub mod error;
pub mod report;
pub mod session_loop;
