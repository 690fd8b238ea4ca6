use anyhow::{Context, Result};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::codec::FORM_CONTENT_TYPE;
use crate::config::EndpointConfig;

/// A response body delivered chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// The network side of the client: send a request, get the response bytes.
///
/// Retries, proxies and the like belong in implementations of this trait.
pub trait Transport {
    /// POSTs an already encoded form body and returns the whole response body.
    fn post_form(&self, url: &str, body: String) -> impl Future<Output = Result<Bytes>> + Send;

    /// GETs a document as a chunked stream.
    fn get(&self, url: &str) -> impl Future<Output = Result<ByteStream>> + Send;
}

/// [`Transport`] backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .user_agent(endpoint.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn post_form(&self, url: &str, body: String) -> Result<Bytes> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to connect to translate endpoint: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Translate request failed with status {status}: {body}");
        }

        response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response from {url}"))
    }

    async fn get(&self, url: &str) -> Result<ByteStream> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Fetching {url} failed with status {}", response.status());
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.context("Stream error"));

        Ok(Box::pin(stream))
    }
}
