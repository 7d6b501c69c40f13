//! ローカル画像によるカメラ・ファイル選択のテスト

mod support;

use facescan::device::{encode_frame, LocalFile, StillFrameCamera};
use facescan_common::{
    Camera, CaptureSettings, Error, ErrorKind, LiveStream, PickedFile, VideoConstraints,
};
use tempfile::tempdir;

/// 静止画カメラで撮影するとJPEGのData URL
#[tokio::test]
async fn test_grab_frame_jpeg() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("frame.png");
    support::write_png(&path, 64, 48);

    let mut camera = StillFrameCamera::new(Some(path));
    let mut stream = camera.open(VideoConstraints::user_facing()).await.unwrap();
    let url = stream.grab_frame(&CaptureSettings::default()).await.unwrap();
    assert_eq!(url.mime_type(), "image/jpeg");

    let bytes = url.decode().unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
}

/// 長辺の上限で縮小される
#[tokio::test]
async fn test_grab_frame_resized() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("frame.png");
    support::write_png(&path, 200, 100);

    let settings = CaptureSettings {
        max_dimension: Some(50),
        ..Default::default()
    };
    let mut stream = StillFrameCamera::new(Some(path))
        .open(VideoConstraints::any())
        .await
        .unwrap();
    let url = stream.grab_frame(&settings).await.unwrap();
    let decoded = image::load_from_memory(&url.decode().unwrap()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (50, 25));
}

/// 停止後は撮影できない
#[tokio::test]
async fn test_grab_after_stop() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("frame.png");
    support::write_png(&path, 8, 8);

    let mut stream = StillFrameCamera::new(Some(path))
        .open(VideoConstraints::any())
        .await
        .unwrap();
    stream.stop();
    stream.stop();
    assert!(stream.is_stopped());
    let err = stream.grab_frame(&CaptureSettings::default()).await.unwrap_err();
    assert!(matches!(err, Error::CameraUnavailable(_)));
}

/// 画像でないファイルはカメラとして開けない
#[tokio::test]
async fn test_open_non_image_frame() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("frame.png");
    std::fs::write(&path, "not an image").unwrap();

    let err = StillFrameCamera::new(Some(path))
        .open(VideoConstraints::any())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, Error::CameraUnavailable(_)));
}

/// ファイル内容からMIMEタイプを判定して読み込む
#[tokio::test]
async fn test_local_file_reads_data_url() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("face.png");
    support::write_png(&path, 4, 4);

    let file = LocalFile::new(&path);
    assert_eq!(file.name(), "face.png");
    assert_eq!(file.mime_type(), "image/png");
    let url = file.read_data_url().await.unwrap();
    assert_eq!(url.mime_type(), "image/png");
    assert_eq!(url.decode().unwrap(), std::fs::read(&path).unwrap());
}

/// 拡張子を偽ったテキストは画像として扱わない
#[tokio::test]
async fn test_local_file_disguised_text() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("face.jpg");
    std::fs::write(&path, "hello").unwrap();

    let url = LocalFile::new(&path).read_data_url().await.unwrap();
    assert!(!url.is_image());
}

/// 存在しないファイル
#[tokio::test]
async fn test_local_file_missing() {
    let err = LocalFile::new("/nonexistent/path/12345.png")
        .read_data_url()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileRead(_)));
}

/// エンコードできないフレームはカメラ拒否ではなく変換エラー
#[test]
fn test_encode_failure_is_not_camera_error() {
    let settings = CaptureSettings {
        mime_type: "image/png".into(),
        ..Default::default()
    };
    let err = encode_frame(&image::DynamicImage::new_rgb8(0, 0), &settings).unwrap_err();
    assert!(matches!(err, Error::Encode(_)), "unexpected error: {:?}", err);
    assert_ne!(err.kind(), ErrorKind::Capability);
    assert_eq!(err.user_message(), Some(facescan_common::error::MSG_ENCODE_FAILED));
}
