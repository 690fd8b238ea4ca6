//! Single-to-double quote rewriting, so a JavaScript object literal can be
//! handed to a strict JSON decoder.

use anyhow::Result;
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};

/// Rewrites every `'` in `bytes` to `"` in place.
pub fn to_double_quotes(bytes: &mut [u8]) {
    for byte in bytes.iter_mut().filter(|b| **b == b'\'') {
        *byte = b'"';
    }
}

/// Applies [`to_double_quotes`] to every chunk of a byte stream.
///
/// The rewrite is byte-local, so chunk boundaries do not matter.
pub fn normalize_quotes<S>(stream: S) -> impl Stream<Item = Result<Bytes>>
where
    S: Stream<Item = Result<Bytes>>,
{
    stream.map(|chunk| {
        let mut chunk = BytesMut::from(&chunk?[..]);
        to_double_quotes(&mut chunk);
        Ok(chunk.freeze())
    })
}
