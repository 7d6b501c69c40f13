//! 撮影・選択から診断までの通しテスト（診断APIはモック）

mod support;

use facescan::client::HttpDiagnosisClient;
use facescan::device::{LocalFile, StillFrameCamera};
use facescan_common::{
    Action, CaptureSettings, Controller, DiagnosisConfig, Error, Mode, ResultCard, Slot,
};
use support::{endpoint, reply, request_bodies, serve};
use tempfile::tempdir;

const RESULT: &str = r#"{"result":"キャッチフレーズ: 陽だまりの微笑み\n美人度: 92点\n推定年齢: 25歳\n目元: 涼しげ\n----------\n似ている芸能人\n- 女優A\n- 女優B\nコメント: 自然体が魅力\n※エンタメ目的の診断です"}"#;

type TestController = Controller<StillFrameCamera, HttpDiagnosisClient>;

fn controller(url: &str, frame: Option<std::path::PathBuf>) -> TestController {
    let client = HttpDiagnosisClient::new(&DiagnosisConfig {
        endpoint: url.to_string(),
        timeout_secs: 5,
    })
    .unwrap();
    Controller::new(StillFrameCamera::new(frame), client, CaptureSettings::default())
}

/// カメラ起動→撮影→診断→リセット
#[tokio::test]
async fn test_camera_flow() {
    let dir = tempdir().expect("Failed to create temp dir");
    let frame = dir.path().join("frame.png");
    support::write_png(&frame, 32, 32);
    let server = serve(vec![reply(200, RESULT)]).await;
    let mut c = controller(&endpoint(&server), Some(frame));

    assert_eq!(c.start().await.unwrap(), Mode::Capturing);
    assert_eq!(c.capture().await.unwrap(), Mode::Captured);
    assert_eq!(c.diagnose().await.unwrap(), Mode::Result);

    let card = ResultCard::from_text(c.result_text());
    assert_eq!(card.headline.unwrap().value, "陽だまりの微笑み");
    assert_eq!(card.score.unwrap().number(), Some(92));
    assert_eq!(card.celebrities.len(), 2);
    assert_eq!(card.sub_scores[0].slot, Slot::SubScore(1));

    let bodies = request_bodies(&server).await;
    assert!(bodies[0]["image"].as_str().unwrap().starts_with("data:image/jpeg;base64,"));

    let report = c.reset();
    assert!(report.release_camera);
    assert_eq!(c.mode(), Mode::Idle);
    assert!(c.result_text().is_empty());
}

/// 失敗しても画像は残り、再診断できる
#[tokio::test]
async fn test_retry_after_server_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("face.png");
    support::write_png(&path, 16, 16);
    let server = serve(vec![reply(500, r#"{"error":"overloaded"}"#), reply(200, RESULT)])
    .await;
    let mut c = controller(&endpoint(&server), None);

    assert_eq!(c.select_file(Some(LocalFile::new(&path))).await.unwrap(), Mode::FileSelected);

    let err = c.diagnose().await.unwrap_err();
    assert!(matches!(err, Error::ServiceStatus(500)));
    assert_eq!(c.mode(), Mode::FileSelected);
    assert!(c.session().image().is_some());
    assert!(!c.session().is_busy());

    assert_eq!(c.diagnose().await.unwrap(), Mode::Result);
    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
}

/// 画像がなければ送信しない
#[tokio::test]
async fn test_diagnose_without_image() {
    let server = serve(vec![reply(200, RESULT)]).await;
    let mut c = controller(&endpoint(&server), None);

    let err = c.diagnose().await.unwrap_err();
    assert!(matches!(err, Error::NoImage));
    assert_eq!(err.user_message(), Some("画像を撮影または参照してください！"));
    assert_eq!(c.mode(), Mode::Idle);
    assert!(request_bodies(&server).await.is_empty());
}

/// 画像でないファイルは受け付けない
#[tokio::test]
async fn test_select_non_image() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();
    let server = serve(vec![reply(200, RESULT)]).await;
    let mut c = controller(&endpoint(&server), None);

    let err = c.select_file(Some(LocalFile::new(&path))).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedFile(_)));
    assert_eq!(c.mode(), Mode::Idle);

    // 未選択は何もしない
    assert_eq!(c.select_file(None::<LocalFile>).await.unwrap(), Mode::Idle);
}

/// カメラ画像なしで起動すると失敗し、状態は変わらない
#[tokio::test]
async fn test_start_without_camera() {
    let server = serve(vec![reply(200, RESULT)]).await;
    let mut c = controller(&endpoint(&server), None);

    let err = c.start().await.unwrap_err();
    assert_eq!(err.user_message(), Some("カメラのアクセスが許可されていません。設定を確認してください。"));
    assert_eq!(c.mode(), Mode::Idle);
}

/// ファイル選択後に撮影へ切り替えてもカメラ画像で診断される
#[tokio::test]
async fn test_retake_from_file_selected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let frame = dir.path().join("frame.png");
    let file = dir.path().join("face.png");
    support::write_png(&frame, 20, 20);
    support::write_png(&file, 10, 10);
    let server = serve(vec![reply(200, RESULT)]).await;
    let mut c = controller(&endpoint(&server), Some(frame));

    c.select_file(Some(LocalFile::new(&file))).await.unwrap();
    assert_eq!(c.dispatch(Action::Retake).await.unwrap(), Mode::Capturing);
    assert!(c.session().image().is_none());
    assert_eq!(c.capture().await.unwrap(), Mode::Captured);
    assert_eq!(c.session().image().unwrap().mime_type(), "image/jpeg");

    // 撮影済みからも画像を捨てて初期状態へ戻れる
    assert_eq!(c.reselect().await.unwrap(), Mode::Idle);
    assert!(c.session().image().is_none());
}
