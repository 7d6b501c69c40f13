//! 診断APIクライアントのテスト

mod support;

use facescan::client::HttpDiagnosisClient;
use facescan_common::{DataUrl, DiagnosisConfig, DiagnosisService, Error};
use std::time::Duration;
use support::{delayed, endpoint, reply, request_bodies, serve};

fn image() -> DataUrl {
    DataUrl::from_bytes("image/jpeg", &[0xff, 0xd8, 0xff, 0xe0])
}

fn client(url: &str, timeout_secs: u64) -> HttpDiagnosisClient {
    HttpDiagnosisClient::new(&DiagnosisConfig {
        endpoint: url.to_string(),
        timeout_secs,
    })
    .unwrap()
}

/// 200 + {"result": ...} なら結果テキスト
#[tokio::test]
async fn test_diagnose_ok() {
    let server = serve(vec![reply(200, r#"{"result":"キャッチフレーズ: 春風"}"#)]).await;
    let text = client(&endpoint(&server), 5).diagnose(&image()).await.unwrap();
    assert_eq!(text, "キャッチフレーズ: 春風");

    // 送信ボディは {"image": "<data url>"}
    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["image"], image().as_str());
}

/// 500 はサービスエラー
#[tokio::test]
async fn test_diagnose_server_error() {
    let server = serve(vec![reply(500, r#"{"error":"boom"}"#)]).await;
    let err = client(&endpoint(&server), 5).diagnose(&image()).await.unwrap_err();
    assert!(matches!(err, Error::ServiceStatus(500)));
    assert_eq!(err.user_message(), Some("診断に失敗しました。"));
}

/// result フィールドがない
#[tokio::test]
async fn test_diagnose_malformed_body() {
    let server = serve(vec![reply(200, r#"{"unexpected":true}"#)]).await;
    let err = client(&endpoint(&server), 5).diagnose(&image()).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

/// 応答が遅すぎる
#[tokio::test]
async fn test_diagnose_timeout() {
    let server = serve(vec![delayed(200, r#"{"result":"late"}"#, Duration::from_secs(3))]).await;
    let err = client(&endpoint(&server), 1).diagnose(&image()).await.unwrap_err();
    assert!(matches!(err, Error::Timeout(1)), "unexpected error: {:?}", err);
}

/// 接続できない
#[tokio::test]
async fn test_diagnose_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/upload", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&url, 5).diagnose(&image()).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}
