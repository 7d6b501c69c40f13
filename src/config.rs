use crate::error::{FaceScanError, Result};
use facescan_common::AppConfig;
use std::path::{Path, PathBuf};

/// 診断APIのURLを上書きする環境変数
pub const ENDPOINT_ENV: &str = "FACESCAN_ENDPOINT";

/// 設定ファイル
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// `~/.config/facescan/config.json`
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| FaceScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(Self::at(home.join(".config").join("facescan").join("config.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ファイルがなければ既定値
    pub fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "config file not found; using defaults");
            return Ok(AppConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(AppConfig::from_json(&content)?)
    }

    /// 読み込み後、環境変数の上書きを反映する
    pub fn load_with_env(&self) -> Result<AppConfig> {
        let mut config = self.load()?;
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                config.diagnosis.endpoint = endpoint.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn set_endpoint(&self, endpoint: String) -> Result<AppConfig> {
        let mut config = self.load()?;
        config.diagnosis.endpoint = endpoint;
        self.save(&config)?;
        Ok(config)
    }
}
