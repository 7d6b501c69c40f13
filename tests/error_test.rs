//! エラーケーステスト
//!
//! 設定ファイルとエラー表示の扱いを検証

use facescan::config::ConfigStore;
use facescan::error::FaceScanError;
use facescan_common::Error;
use tempfile::tempdir;

/// 設定ファイルがなければ既定値
#[test]
fn test_missing_config_is_default() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = ConfigStore::at(dir.path().join("none.json"));
    let config = store.load().unwrap();
    assert_eq!(config.diagnosis.timeout_secs, 30);
}

/// 保存して読み直す
#[test]
fn test_set_endpoint_persists() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = ConfigStore::at(dir.path().join("nested").join("config.json"));
    store.set_endpoint("http://localhost:9000/api/upload".into()).unwrap();

    let config = store.load().unwrap();
    assert_eq!(config.diagnosis.endpoint, "http://localhost:9000/api/upload");
}

/// 空のURLは保存できない
#[test]
fn test_set_empty_endpoint_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = ConfigStore::at(dir.path().join("config.json"));
    let err = store.set_endpoint("  ".into()).unwrap_err();
    assert!(matches!(err, FaceScanError::Session(Error::Config(_))));
    assert!(!store.path().exists());
}

/// 壊れたJSON
#[test]
fn test_broken_config_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = ConfigStore::at(&path).load().unwrap_err();
    assert!(matches!(err, FaceScanError::Session(Error::Json(_))));
}

/// 範囲外の品質
#[test]
fn test_invalid_quality_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"capture": {"quality": 3.0}}"#).unwrap();
    assert!(ConfigStore::at(&path).load().is_err());
}

/// FaceScanErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        FaceScanError::Config("テスト設定エラー".to_string()),
        FaceScanError::FileNotFound("face.jpg".to_string()),
        FaceScanError::HttpClient("tls".to_string()),
        FaceScanError::Prompt("中断".to_string()),
    ];

    for err in errors {
        let msg = err.to_string();
        assert!(!msg.is_empty(), "Error message should not be empty");
    }
}

/// 利用者向けメッセージはセッションエラーの文言を使う
#[test]
fn test_user_message() {
    let err = FaceScanError::from(Error::NoImage);
    assert_eq!(err.user_message(), "画像を撮影または参照してください！");

    let err = FaceScanError::from(Error::CameraUnavailable("NotAllowedError".into()));
    assert_eq!(err.user_message(), "カメラのアクセスが許可されていません。設定を確認してください。");

    let err = FaceScanError::from(Error::Timeout(30));
    assert_eq!(err.user_message(), "診断に失敗しました。");

    let err = FaceScanError::FileNotFound("a.png".into());
    assert!(err.user_message().contains("a.png"));
}
