//! Data URL型
//!
//! 撮影・選択した画像は `data:<mime>;base64,<payload>` 形式で保持し、そのまま診断APIへ送る。

use crate::error::{Error, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 検証済みのbase64 Data URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUrl(String);

impl DataUrl {
    /// 文字列を検証してData URLとして受け取る
    ///
    /// # Examples
    /// ```
    /// use facescan_common::DataUrl;
    ///
    /// let url = DataUrl::parse("data:image/jpeg;base64,/9j/4AAQ").unwrap();
    /// assert_eq!(url.mime_type(), "image/jpeg");
    /// assert_eq!(url.payload(), "/9j/4AAQ");
    /// ```
    pub fn parse(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        let rest = s
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidDataUrl("data: で始まっていません".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidDataUrl("カンマ区切りがありません".into()))?;
        if !header.ends_with(";base64") {
            return Err(Error::InvalidDataUrl("base64形式ではありません".into()));
        }
        if payload.is_empty() {
            return Err(Error::InvalidDataUrl("データが空です".into()));
        }
        Ok(Self(s))
    }

    /// バイト列からData URLを作る
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{};base64,{}", mime_type, payload))
    }

    /// MIMEタイプ（例: "image/jpeg"）
    pub fn mime_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|s| s.split(';').next())
            .unwrap_or("")
    }

    /// base64部分
    pub fn payload(&self) -> &str {
        self.0.split_once(',').map(|(_, p)| p).unwrap_or("")
    }

    /// base64をデコードしたバイト列
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.payload())
            .map_err(|e| Error::InvalidDataUrl(e.to_string()))
    }

    pub fn is_image(&self) -> bool {
        is_image_mime(self.mime_type())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ファイル選択で受け付けるMIMEタイプか（`accept="image/*"` 相当）
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type
        .split(';')
        .next()
        .map(|m| m.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DataUrl {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<DataUrl> for String {
    fn from(value: DataUrl) -> Self {
        value.0
    }
}
