//! Splits an input stream into request-sized segments.
//!
//! Each read is cut right after its last newline; whatever follows is carried
//! over to the front of the buffer and prefixed to the next segment.

use bytes::Bytes;
use futures_util::Stream;
use std::io::{self, ErrorKind};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Upper bound on a single request's text, in bytes.
pub const SEGMENT_CAPACITY: usize = 5000;

/// Yields the segments of `reader` in order.
///
/// Every segment is at most [`SEGMENT_CAPACITY`] bytes and the segments
/// concatenate back to the exact input. An empty reader yields nothing.
pub fn segments<R>(mut reader: R) -> impl Stream<Item = io::Result<Bytes>>
where
    R: AsyncRead + Unpin,
{
    async_stream::try_stream! {
        let mut buf = vec![0u8; SEGMENT_CAPACITY];
        let mut carried = 0;

        loop {
            let read = read_block(&mut reader, &mut buf[carried..]).await?;
            if read == 0 {
                if carried > 0 {
                    yield Bytes::copy_from_slice(&buf[..carried]);
                }
                break;
            }

            // Carried bytes never hold a newline.
            let filled = carried + read;
            let end = cut_point(&buf[..filled]);
            if end > 0 {
                yield Bytes::copy_from_slice(&buf[..end]);
            }

            buf.copy_within(end..filled, 0);
            carried = filled - end;
        }
    }
}

async fn read_block<R>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    loop {
        match reader.read(buf).await {
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            result => return result,
        }
    }
}

/// Where to cut a filled block: after its last newline, or at its end minus
/// any incomplete UTF-8 sequence.
fn cut_point(block: &[u8]) -> usize {
    block
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or_else(|| block.len() - incomplete_utf8_tail(block), |i| i + 1)
}

/// Number of trailing bytes that start a UTF-8 sequence the block does not finish.
fn incomplete_utf8_tail(block: &[u8]) -> usize {
    for back in 1..=block.len().min(3) {
        let byte = block[block.len() - back];
        if byte & 0b1100_0000 == 0b1000_0000 {
            continue;
        }
        let width = match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if width > back { back } else { 0 };
    }
    0
}
