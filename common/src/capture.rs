//! 画像取得（カメラ・ファイル）
//!
//! ブラウザでは getUserMedia / canvas / FileReader、ネイティブでは画像ファイルが実体になる。
//! どちらも同じトレイトでコントローラに渡す。

use crate::data_url::DataUrl;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 撮影画像の圧縮品質（canvas.toDataURL の encoderOptions 相当）
pub const DEFAULT_JPEG_QUALITY: f32 = 0.7;

/// 撮影設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureSettings {
    /// 出力MIMEタイプ
    pub mime_type: String,
    /// 0.0〜1.0
    pub quality: f32,
    /// 長辺の上限。None なら元の解像度のまま
    pub max_dimension: Option<u32>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            mime_type: "image/jpeg".into(),
            quality: DEFAULT_JPEG_QUALITY,
            max_dimension: None,
        }
    }
}

impl CaptureSettings {
    /// 0〜100 の整数品質（image crate の JpegEncoder 用）
    pub fn quality_percent(&self) -> u8 {
        (self.quality.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    /// 元映像サイズから出力サイズを決める
    pub fn target_size(&self, source: FrameSize) -> FrameSize {
        match self.max_dimension {
            Some(max) => source.fit_within(max),
            None => source,
        }
    }
}

/// フレームサイズ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 縦横比を保って長辺を `max` 以下に縮小する（拡大はしない）
    ///
    /// # Examples
    /// ```
    /// use facescan_common::capture::FrameSize;
    ///
    /// let size = FrameSize::new(1920, 1080).fit_within(960);
    /// assert_eq!(size, FrameSize::new(960, 540));
    /// ```
    pub fn fit_within(self, max: u32) -> Self {
        let long = self.width.max(self.height);
        if long <= max || long == 0 || max == 0 {
            return self;
        }
        let scale = max as f64 / long as f64;
        Self {
            width: ((self.width as f64 * scale).round() as u32).max(1),
            height: ((self.height as f64 * scale).round() as u32).max(1),
        }
    }
}

/// カメラの向き
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// インカメラ
    User,
    /// アウトカメラ
    Environment,
}

/// getUserMedia の video 制約
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VideoConstraints {
    #[serde(rename = "facingMode", skip_serializing_if = "Option::is_none")]
    pub facing_mode: Option<FacingMode>,
}

impl VideoConstraints {
    /// `{ facingMode: "user" }`
    pub fn user_facing() -> Self {
        Self {
            facing_mode: Some(FacingMode::User),
        }
    }

    /// 制約なし（`video: true`）
    pub fn any() -> Self {
        Self { facing_mode: None }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.facing_mode.is_none()
    }
}

/// カメラデバイス
#[async_trait(?Send)]
pub trait Camera {
    type Stream: LiveStream;

    /// ストリームを開く
    ///
    /// 制約を満たせない場合は [`crate::Error::ConstraintRejected`]、
    /// 拒否・未接続は [`crate::Error::CameraUnavailable`] を返す。
    async fn open(&mut self, constraints: VideoConstraints) -> Result<Self::Stream>;
}

/// インカメラ指定で開き、制約が拒否されたら制約なしで1回だけ開きなおす
pub async fn open_with_fallback<C: Camera>(camera: &mut C) -> Result<C::Stream> {
    match camera.open(VideoConstraints::user_facing()).await {
        Err(crate::error::Error::ConstraintRejected(reason)) => {
            tracing::info!(%reason, "facingMode rejected; retrying without constraints");
            camera.open(VideoConstraints::any()).await
        }
        other => other,
    }
}

/// 開いているカメラストリーム
#[async_trait(?Send)]
pub trait LiveStream {
    /// 現在のフレームを設定に従ってエンコードする
    async fn grab_frame(&mut self, settings: &CaptureSettings) -> Result<DataUrl>;

    /// トラックを停止する。複数回呼んでもよい
    fn stop(&mut self);
}

/// 利用者が選んだファイル
#[async_trait(?Send)]
pub trait PickedFile {
    fn name(&self) -> String;

    /// MIMEタイプ（不明なら空文字）
    fn mime_type(&self) -> String;

    /// Data URLとして読み込む
    async fn read_data_url(&self) -> Result<DataUrl>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_within_landscape() {
        assert_eq!(FrameSize::new(1280, 720).fit_within(640), FrameSize::new(640, 360));
    }

    #[test]
    fn test_fit_within_portrait() {
        assert_eq!(FrameSize::new(720, 1280).fit_within(640), FrameSize::new(360, 640));
    }

    #[test]
    fn test_fit_within_no_upscale() {
        assert_eq!(FrameSize::new(320, 240).fit_within(640), FrameSize::new(320, 240));
        assert_eq!(FrameSize::new(0, 0).fit_within(640), FrameSize::new(0, 0));
    }

    #[test]
    fn test_target_size() {
        let mut settings = CaptureSettings::default();
        assert_eq!(settings.target_size(FrameSize::new(1920, 1080)), FrameSize::new(1920, 1080));
        settings.max_dimension = Some(800);
        assert_eq!(settings.target_size(FrameSize::new(1920, 1080)), FrameSize::new(800, 450));
    }

    #[test]
    fn test_quality_percent() {
        assert_eq!(CaptureSettings::default().quality_percent(), 70);
        let settings = CaptureSettings {
            quality: 1.5,
            ..Default::default()
        };
        assert_eq!(settings.quality_percent(), 100);
    }

    #[test]
    fn test_constraints_json() {
        let json = serde_json::to_string(&VideoConstraints::user_facing()).unwrap();
        assert_eq!(json, r#"{"facingMode":"user"}"#);
        let json = serde_json::to_string(&VideoConstraints::any()).unwrap();
        assert_eq!(json, "{}");
        assert!(VideoConstraints::any().is_unconstrained());
    }
}
