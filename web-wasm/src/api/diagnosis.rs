//! 診断API連携（fetch）

use async_trait::async_trait;
use facescan_common::diagnosis::{parse_response, DiagnosisRequest};
use facescan_common::{DataUrl, DiagnosisConfig, DiagnosisService, Error, Result};
use futures::future::{select, Either};
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

pub struct FetchDiagnosisClient {
    endpoint: String,
    timeout_secs: u64,
}

impl FetchDiagnosisClient {
    pub fn new(config: &DiagnosisConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    /// POSTしてステータスと本文を返す
    async fn post(&self, body: String) -> std::result::Result<(u16, String), JsValue> {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(&self.endpoint, &opts)?;
        request.headers().set("Content-Type", "application/json")?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: Response = resp_value.dyn_into()?;

        let text = JsFuture::from(resp.text()?).await?;
        Ok((resp.status(), text.as_string().unwrap_or_default()))
    }
}

#[async_trait(?Send)]
impl DiagnosisService for FetchDiagnosisClient {
    async fn diagnose(&self, image: &DataUrl) -> Result<String> {
        let body = DiagnosisRequest::new(image).to_json()?;
        let millis = u32::try_from(self.timeout_secs.saturating_mul(1000)).unwrap_or(u32::MAX);

        let request = Box::pin(self.post(body));
        let timeout = TimeoutFuture::new(millis);
        match select(request, timeout).await {
            Either::Left((Ok((status, text)), _)) => {
                gloo::console::debug!(format!("diagnosis response: {} ({} bytes)", status, text.len()));
                parse_response(status, &text)
            }
            Either::Left((Err(e), _)) => Err(Error::Network(format!("{:?}", e))),
            Either::Right(_) => Err(Error::Timeout(self.timeout_secs)),
        }
    }
}
