// ABOUTME: JSON-over-HTTP capability host for a local inference service.
// ABOUTME: GET /v1/capabilities, POST /v1/detect, /v1/translate, /v1/summarize.

use crate::capability::{
    CapabilityHost, Detection, HostCapabilities, LanguageDetector, SummarizerOptions, Summarizer,
    Translator,
};
use crate::error::{CapabilityError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub struct HttpHost {
    client: Client,
    base: Url,
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct DetectResponse {
    #[serde(default)]
    results: Vec<Detection>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    text: &'a str,
    source_language: &'a str,
    target_language: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translation: String,
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
    #[serde(flatten)]
    options: &'a SummarizerOptions,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    summary: String,
}

impl HttpHost {
    /// `base_url` is the service root, e.g. "http://localhost:7070".
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base =
            Url::parse(base_url).map_err(|e| CapabilityError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(CapabilityError::InvalidUrl(base_url.to_string()));
        }
        // Url::join replaces the last path segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CapabilityError::Request(e.to_string()))?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| CapabilityError::InvalidUrl(e.to_string()))
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(CapabilityError::Host { status, body });
    }
    resp.json::<T>()
        .await
        .map_err(|e| CapabilityError::Decode(e.to_string()))
}

async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
    client: &Client,
    url: Url,
    body: &B,
) -> Result<T> {
    let resp = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| CapabilityError::Request(e.to_string()))?;
    decode(resp).await
}

#[async_trait]
impl CapabilityHost for HttpHost {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn capabilities(&self) -> Result<HostCapabilities> {
        let resp = self
            .client
            .get(self.endpoint("v1/capabilities")?)
            .send()
            .await
            .map_err(|e| CapabilityError::Request(e.to_string()))?;
        decode(resp).await
    }

    async fn create_detector(&self) -> Result<Arc<dyn LanguageDetector>> {
        Ok(Arc::new(HttpDetector {
            client: self.client.clone(),
            url: self.endpoint("v1/detect")?,
        }))
    }

    async fn create_translator(&self, source: &str, target: &str) -> Result<Box<dyn Translator>> {
        Ok(Box::new(HttpTranslator {
            client: self.client.clone(),
            url: self.endpoint("v1/translate")?,
            source: source.to_string(),
            target: target.to_string(),
        }))
    }

    async fn create_summarizer(&self, options: &SummarizerOptions) -> Result<Box<dyn Summarizer>> {
        Ok(Box::new(HttpSummarizer {
            client: self.client.clone(),
            url: self.endpoint("v1/summarize")?,
            options: options.clone(),
        }))
    }
}

struct HttpDetector {
    client: Client,
    url: Url,
}

#[async_trait]
impl LanguageDetector for HttpDetector {
    async fn detect(&self, text: &str) -> Result<Vec<Detection>> {
        let resp: DetectResponse =
            post_json(&self.client, self.url.clone(), &DetectRequest { text }).await?;
        Ok(resp.results)
    }
}

struct HttpTranslator {
    client: Client,
    url: Url,
    source: String,
    target: String,
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        let req = TranslateRequest {
            text,
            source_language: &self.source,
            target_language: &self.target,
        };
        let resp: TranslateResponse = post_json(&self.client, self.url.clone(), &req).await?;
        Ok(resp.translation)
    }
}

struct HttpSummarizer {
    client: Client,
    url: Url,
    options: SummarizerOptions,
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        let req = SummarizeRequest {
            text,
            options: &self.options,
        };
        let resp: SummarizeResponse = post_json(&self.client, self.url.clone(), &req).await?;
        Ok(resp.summary)
    }
}
