//! 診断APIクライアント（reqwest）

use crate::error::{FaceScanError, Result};
use async_trait::async_trait;
use facescan_common::diagnosis::{parse_response, DiagnosisRequest};
use facescan_common::{DataUrl, DiagnosisConfig, DiagnosisService, Error};
use std::time::Duration;

pub struct HttpDiagnosisClient {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl HttpDiagnosisClient {
    pub fn new(config: &DiagnosisConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FaceScanError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.timeout_secs)
        } else {
            Error::Network(e.to_string())
        }
    }
}

#[async_trait(?Send)]
impl DiagnosisService for HttpDiagnosisClient {
    async fn diagnose(&self, image: &DataUrl) -> facescan_common::Result<String> {
        tracing::debug!(endpoint = %self.endpoint, bytes = image.as_str().len(), "posting image");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&DiagnosisRequest::new(image))
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.map_error(e))?;
        tracing::debug!(status, body_len = body.len(), "diagnosis response");
        parse_response(status, &body)
    }
}
