//! アプリ設定
//!
//! すべての項目に既定値があり、JSONでは変更したい項目だけ書けばよい。

use crate::capture::CaptureSettings;
use crate::diagnosis::DiagnosisConfig;
use crate::error::{Error, Result};
use crate::policy::UiPolicy;
use crate::share::ShareSettings;
use serde::{Deserialize, Serialize};

/// アプリ設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub diagnosis: DiagnosisConfig,
    pub capture: CaptureSettings,
    pub share: ShareSettings,
    pub ui: UiPolicy,
}

impl AppConfig {
    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 値の範囲チェック
    pub fn validate(&self) -> Result<()> {
        if self.diagnosis.endpoint.trim().is_empty() {
            return Err(Error::Config("diagnosis.endpoint が空です".into()));
        }
        if self.diagnosis.timeout_secs == 0 {
            return Err(Error::Config("diagnosis.timeoutSecs は1以上にしてください".into()));
        }
        if !(0.0..=1.0).contains(&self.capture.quality) {
            return Err(Error::Config(format!(
                "capture.quality は0.0〜1.0の範囲です: {}",
                self.capture.quality
            )));
        }
        Ok(())
    }
}
