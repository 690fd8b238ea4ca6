mod delimiter;
mod quotes;

use anyhow::Result;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};

pub use delimiter::{DelimiterNotFound, DelimiterScanner, skip_past};
pub use quotes::{normalize_quotes, to_double_quotes};

/// Collects everything left in `stream`, starting with `head`.
pub async fn read_to_end<S>(head: &[u8], stream: S) -> Result<Vec<u8>>
where
    S: Stream<Item = Result<Bytes>>,
{
    let mut stream = std::pin::pin!(stream);
    let mut buffer = head.to_vec();

    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }

    Ok(buffer)
}
