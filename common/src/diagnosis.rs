//! 診断API
//!
//! `POST <endpoint>` に `{ "image": "<data-url>" }` を送り、`{ "result": "<text>" }` を受け取る。
//! レスポンスの判定はネイティブ版（reqwest）とWASM版（fetch）で共有する。

use crate::data_url::DataUrl;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://facescan-api.onrender.com/api/upload";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 診断APIリクエスト
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisRequest<'a> {
    pub image: &'a str,
}

impl<'a> DiagnosisRequest<'a> {
    pub fn new(image: &'a DataUrl) -> Self {
        Self { image: image.as_str() }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// 診断APIレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosisResponse {
    pub result: String,
}

/// 診断API設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosisConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// ステータスコードと本文から診断結果テキストを取り出す
///
/// 2xx以外、JSONでない本文、`result` が文字列でない本文はすべて失敗。
///
/// # Examples
/// ```
/// use facescan_common::diagnosis::parse_response;
///
/// let text = parse_response(200, r#"{"result":"美人度: 88"}"#).unwrap();
/// assert_eq!(text, "美人度: 88");
/// assert!(parse_response(500, r#"{"result":"x"}"#).is_err());
/// ```
pub fn parse_response(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        return Err(Error::ServiceStatus(status));
    }
    let response: DiagnosisResponse =
        serde_json::from_str(body).map_err(|e| Error::MalformedResponse(e.to_string()))?;
    Ok(response.result)
}

/// 診断サービス
#[async_trait(?Send)]
pub trait DiagnosisService {
    /// 画像を送信し、`result` テキストを返す
    async fn diagnose(&self, image: &DataUrl) -> Result<String>;
}
