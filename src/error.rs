use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaceScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("HTTPクライアントの初期化に失敗: {0}")]
    HttpClient(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Session(#[from] facescan_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl FaceScanError {
    /// 利用者向けの短いメッセージ
    pub fn user_message(&self) -> String {
        match self {
            FaceScanError::Session(e) => e
                .user_message()
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string()),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FaceScanError>;
