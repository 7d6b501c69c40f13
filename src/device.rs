//! ローカル画像ファイルによるカメラ・ファイル選択の実装
//!
//! 端末のカメラは扱わず、指定した静止画を「カメラ映像」として撮影する。

use async_trait::async_trait;
use facescan_common::capture::FrameSize;
use facescan_common::{
    Camera, CaptureSettings, DataUrl, Error, LiveStream, PickedFile, Result, VideoConstraints,
};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// 静止画をカメラ映像として扱う
#[derive(Debug, Clone, Default)]
pub struct StillFrameCamera {
    frame: Option<PathBuf>,
}

impl StillFrameCamera {
    pub fn new(frame: Option<PathBuf>) -> Self {
        Self { frame }
    }
}

#[async_trait(?Send)]
impl Camera for StillFrameCamera {
    type Stream = StillFrameStream;

    async fn open(&mut self, constraints: VideoConstraints) -> Result<StillFrameStream> {
        let path = self
            .frame
            .as_ref()
            .ok_or_else(|| Error::CameraUnavailable("カメラ画像が指定されていません".into()))?;
        tracing::debug!(path = %path.display(), ?constraints, "opening still-frame camera");
        let frame = image::open(path)
            .map_err(|e| Error::CameraUnavailable(format!("{}: {}", path.display(), e)))?;
        Ok(StillFrameStream {
            frame,
            stopped: false,
        })
    }
}

pub struct StillFrameStream {
    frame: DynamicImage,
    stopped: bool,
}

impl StillFrameStream {
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[async_trait(?Send)]
impl LiveStream for StillFrameStream {
    async fn grab_frame(&mut self, settings: &CaptureSettings) -> Result<DataUrl> {
        if self.stopped {
            return Err(Error::CameraUnavailable("ストリームは停止しています".into()));
        }
        let (width, height) = self.frame.dimensions();
        let target = settings.target_size(FrameSize::new(width, height));
        let frame = if target.width == width && target.height == height {
            self.frame.clone()
        } else {
            self.frame.resize_exact(target.width, target.height, FilterType::Triangle)
        };
        encode_frame(&frame, settings)
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

/// 設定のMIMEタイプでエンコードしてData URLにする（JPEG以外はPNG）
pub fn encode_frame(frame: &DynamicImage, settings: &CaptureSettings) -> Result<DataUrl> {
    let mut buf = Vec::new();
    if settings.mime_type == "image/jpeg" {
        let rgb = DynamicImage::ImageRgb8(frame.to_rgb8());
        let encoder = JpegEncoder::new_with_quality(&mut buf, settings.quality_percent());
        rgb.write_with_encoder(encoder)
            .map_err(|e| Error::Encode(format!("JPEG: {}", e)))?;
        Ok(DataUrl::from_bytes("image/jpeg", &buf))
    } else {
        frame
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| Error::Encode(format!("PNG: {}", e)))?;
        Ok(DataUrl::from_bytes("image/png", &buf))
    }
}

/// ローカルファイル
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait(?Send)]
impl PickedFile for LocalFile {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// 拡張子から推定。拡張子がなければ空文字
    fn mime_type(&self) -> String {
        match ImageFormat::from_path(&self.path) {
            Ok(format) => format.to_mime_type().to_string(),
            Err(_) if self.path.extension().is_some() => "application/octet-stream".into(),
            Err(_) => String::new(),
        }
    }

    async fn read_data_url(&self) -> Result<DataUrl> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::FileRead(format!("{}: {}", self.path.display(), e)))?;
        let mime_type = image::guess_format(&bytes)
            .map(|f| f.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".into());
        Ok(DataUrl::from_bytes(&mime_type, &bytes))
    }
}
