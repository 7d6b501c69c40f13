//! エラー型定義
//!
//! 利用者に見せるメッセージは3分類（カメラ / 入力検証 / 診断サービス）に集約する。

use crate::transition::{Action, Mode};
use thiserror::Error;

/// カメラ起動失敗時のメッセージ
pub const MSG_CAMERA_DENIED: &str = "カメラのアクセスが許可されていません。設定を確認してください。";
/// 画像未選択で診断しようとした時のメッセージ
pub const MSG_NO_IMAGE: &str = "画像を撮影または参照してください！";
/// 画像以外のファイルを選んだ時のメッセージ
pub const MSG_NOT_IMAGE: &str = "画像ファイルを選択してください。";
/// 診断失敗時のメッセージ
pub const MSG_DIAGNOSIS_FAILED: &str = "診断に失敗しました。";
/// 撮影画像の変換失敗時のメッセージ
pub const MSG_ENCODE_FAILED: &str = "画像の変換に失敗しました。もう一度撮影してください。";

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("カメラを利用できません: {0}")]
    CameraUnavailable(String),

    /// 指定した制約（facingMode等）をデバイスが満たせない
    #[error("カメラの制約が受け付けられません: {0}")]
    ConstraintRejected(String),

    #[error("画像がありません")]
    NoImage,

    #[error("画像ファイルではありません: {0}")]
    UnsupportedFile(String),

    #[error("ファイル読み込みエラー: {0}")]
    FileRead(String),

    #[error("Data URLが不正です: {0}")]
    InvalidDataUrl(String),

    /// 撮影フレームのJPEG/PNG変換失敗
    #[error("画像エンコードエラー: {0}")]
    Encode(String),

    #[error("診断サービスに接続できません: {0}")]
    Network(String),

    #[error("診断サービスがエラーを返しました: HTTP {0}")]
    ServiceStatus(u16),

    #[error("診断結果の形式が不正です: {0}")]
    MalformedResponse(String),

    #[error("診断がタイムアウトしました ({0}秒)")]
    Timeout(u64),

    #[error("{mode:?} では {action:?} を実行できません")]
    InvalidTransition { mode: Mode, action: Action },

    #[error("処理中の操作があります")]
    Busy,

    /// reset() 以前に開始された操作の完了通知
    #[error("破棄された操作の完了通知です")]
    Stale,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// 利用者から見たエラー分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// カメラ拒否・未接続
    Capability,
    /// 入力不足・形式違い
    Validation,
    /// 通信・サービス側の失敗
    Service,
    /// UIイベントとして無視してよいもの（不正遷移・多重実行・破棄済み）
    Ignored,
    /// 設定・内部エラー
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CameraUnavailable(_) | Error::ConstraintRejected(_) => ErrorKind::Capability,
            Error::NoImage
            | Error::UnsupportedFile(_)
            | Error::FileRead(_)
            | Error::InvalidDataUrl(_) => ErrorKind::Validation,
            Error::Network(_)
            | Error::ServiceStatus(_)
            | Error::MalformedResponse(_)
            | Error::Timeout(_) => ErrorKind::Service,
            Error::InvalidTransition { .. } | Error::Busy | Error::Stale => ErrorKind::Ignored,
            Error::Encode(_) | Error::Json(_) | Error::Config(_) => ErrorKind::Internal,
        }
    }

    /// 画面に表示するメッセージ。表示不要なら None
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Error::NoImage => Some(MSG_NO_IMAGE),
            Error::UnsupportedFile(_) | Error::FileRead(_) | Error::InvalidDataUrl(_) => {
                Some(MSG_NOT_IMAGE)
            }
            Error::Encode(_) => Some(MSG_ENCODE_FAILED),
            _ => match self.kind() {
                ErrorKind::Capability => Some(MSG_CAMERA_DENIED),
                ErrorKind::Service => Some(MSG_DIAGNOSIS_FAILED),
                ErrorKind::Validation => Some(MSG_NO_IMAGE),
                ErrorKind::Ignored => None,
                ErrorKind::Internal => Some(MSG_DIAGNOSIS_FAILED),
            },
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
