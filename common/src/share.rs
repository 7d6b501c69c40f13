//! シェア用リンクの組み立て
//!
//! 結果テキストから投稿文を作り、各SNSの共有インテントURLを返す。状態は変更しない。

use crate::classify::ResultCard;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

const TWITTER_INTENT_URL: &str = "https://twitter.com/intent/tweet";
const FACEBOOK_SHARER_URL: &str = "https://www.facebook.com/sharer/sharer.php";

pub const INSTAGRAM_NOTICE: &str =
    "Instagramへの直接シェアはできません。画像を保存してInstagramアプリから投稿してください。";

/// シェア先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareTarget {
    X,
    Facebook,
    Instagram,
}

impl ShareTarget {
    pub fn label(self) -> &'static str {
        match self {
            ShareTarget::X => "Xでシェア",
            ShareTarget::Facebook => "Facebookでシェア",
            ShareTarget::Instagram => "Instagramでシェア",
        }
    }
}

/// シェア設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShareSettings {
    /// 投稿文。`{headline}` はキャッチフレーズに置き換わる
    pub message_template: String,
    pub targets: Vec<ShareTarget>,
    /// 結果画像の保存ファイル名
    pub download_filename: String,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            message_template: "【診断結果】{headline} Check out my FaceScan result!".into(),
            targets: vec![ShareTarget::X, ShareTarget::Facebook, ShareTarget::Instagram],
            download_filename: "face_scan_result.png".into(),
        }
    }
}

/// シェアボタン押下時の動作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareAction {
    /// 新しいタブで開く
    Open(String),
    /// 案内を表示するだけ
    Notice(&'static str),
}

impl ShareSettings {
    /// 投稿文を作る
    ///
    /// # Examples
    /// ```
    /// use facescan_common::share::ShareSettings;
    ///
    /// let text = ShareSettings::default().message("キャッチフレーズ: 透明感の妖精");
    /// assert_eq!(text, "【診断結果】透明感の妖精 Check out my FaceScan result!");
    /// ```
    pub fn message(&self, result_text: &str) -> String {
        let card = ResultCard::from_text(result_text);
        let headline = card.headline.map(|f| f.value).unwrap_or_default();
        self.message_template
            .replace("{headline}", &headline)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// シェア先ごとの動作を組み立てる
    pub fn compose(&self, target: ShareTarget, page_url: &str, result_text: &str) -> Result<ShareAction> {
        let action = match target {
            ShareTarget::X => {
                let text = self.message(result_text);
                let url = Url::parse_with_params(TWITTER_INTENT_URL, &[("text", text.as_str()), ("url", page_url)])
                    .map_err(|e| Error::Config(format!("share url: {}", e)))?;
                ShareAction::Open(url.into())
            }
            ShareTarget::Facebook => {
                let url = Url::parse_with_params(FACEBOOK_SHARER_URL, &[("u", page_url)])
                    .map_err(|e| Error::Config(format!("share url: {}", e)))?;
                ShareAction::Open(url.into())
            }
            ShareTarget::Instagram => ShareAction::Notice(INSTAGRAM_NOTICE),
        };
        Ok(action)
    }
}
