use anyhow::{Context, Result};
use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::chunker;
use super::codec;
use super::transport::Transport;

/// One segment's worth of work for the endpoint.
///
/// An empty `source_lang` (or `"auto"`) lets the endpoint detect the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }
}

/// Streams arbitrarily long input through the translate endpoint.
///
/// Segments are translated one at a time, in input order.
pub struct TranslationClient<T> {
    transport: T,
    endpoint: String,
}

impl<T: Transport> TranslationClient<T> {
    pub fn new(transport: T, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Translates everything `reader` produces and writes it to `writer`.
    ///
    /// Every segment's translation ends with a newline. The writer is flushed
    /// after each segment, so on error earlier output has already reached it.
    pub async fn translate<R, W>(
        &self,
        reader: R,
        writer: &mut W,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let segments = chunker::segments(reader);
        let mut segments = std::pin::pin!(segments);
        let mut count = 0usize;

        while let Some(segment) = segments.next().await {
            let segment = segment.context("Failed to read input")?;
            count += 1;
            crate::verbose!("Translating segment {count} ({} bytes)", segment.len());

            let request = TranslationRequest::new(
                String::from_utf8_lossy(&segment),
                source_lang,
                target_lang,
            );
            let translated = self.translate_segment(&request).await?;

            writer
                .write_all(translated.as_bytes())
                .await
                .context("Failed to write translation")?;
            writer.flush().await.context("Failed to write translation")?;
        }

        crate::verbose!("Translated {count} segment(s)");

        Ok(())
    }

    /// In-memory convenience wrapper around [`Self::translate`].
    pub async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String> {
        let mut output = Vec::new();
        self.translate(text.as_bytes(), &mut output, source_lang, target_lang)
            .await?;
        String::from_utf8(output).context("Translation is not valid UTF-8")
    }

    /// Performs a single round trip. Empty text never reaches the network.
    pub async fn translate_segment(&self, request: &TranslationRequest) -> Result<String> {
        if request.text.is_empty() {
            return Ok(String::new());
        }

        let body = codec::encode_request(request)?;
        let response = self.transport.post_form(&self.endpoint, body).await?;

        Ok(codec::decode_response(&response)?)
    }
}
