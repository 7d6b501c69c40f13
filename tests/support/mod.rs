//! テスト用の診断APIモック
//!
//! `POST /api/upload` に決まった応答を返し、受け取ったリクエストは `received_requests` で確認する。

#![allow(dead_code)]

use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const UPLOAD_PATH: &str = "/api/upload";

/// JSONボディ付きの応答
pub fn reply(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.to_owned(), "application/json")
}

/// 応答を遅らせる（タイムアウト確認用）
pub fn delayed(status: u16, body: &str, delay: Duration) -> ResponseTemplate {
    reply(status, body).set_delay(delay)
}

/// 応答を順番に返すモックを起動する。最後の応答は以降も繰り返す
pub async fn serve(responses: Vec<ResponseTemplate>) -> MockServer {
    let server = MockServer::start().await;
    let last = responses.len().saturating_sub(1);
    for (i, response) in responses.into_iter().enumerate() {
        let mock = Mock::given(method("POST")).and(path(UPLOAD_PATH)).respond_with(response);
        let mock = if i < last { mock.up_to_n_times(1) } else { mock };
        mock.mount(&server).await;
    }
    server
}

/// モックの診断エンドポイントURL
pub fn endpoint(server: &MockServer) -> String {
    format!("{}{}", server.uri(), UPLOAD_PATH)
}

/// 受け取ったリクエストボディ（JSON）
pub async fn request_bodies(server: &MockServer) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.body_json().expect("request body is not JSON"))
        .collect()
}

/// 小さなPNGを書き出す
pub fn write_png(path: &std::path::Path, width: u32, height: u32) {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([180, 140, 120]));
    img.save(path).unwrap();
}
