//! Locating a sentinel byte sequence inside a chunked document stream.
//!
//! The scanner keeps its partial-match progress between chunks, so a
//! delimiter may be split across any number of reads.

use anyhow::Result;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use thiserror::Error;

/// Returned when a stream ends before the delimiter was seen.
#[derive(Debug, Error)]
#[error("delimiter {delimiter:?} not found before end of stream")]
pub struct DelimiterNotFound {
    pub delimiter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    /// The first `n` bytes of the delimiter have been matched.
    Partial(usize),
    Matched,
}

/// Incremental delimiter matcher.
///
/// Feed it chunks in order; it reports the offset just past the delimiter in
/// the chunk that completes it.
#[derive(Debug)]
pub struct DelimiterScanner<'a> {
    delimiter: &'a [u8],
    fallback: Vec<usize>,
    state: ScanState,
}

impl<'a> DelimiterScanner<'a> {
    pub fn new(delimiter: &'a [u8]) -> Self {
        let state = if delimiter.is_empty() {
            ScanState::Matched
        } else {
            ScanState::Scanning
        };

        Self {
            delimiter,
            fallback: prefix_table(delimiter),
            state,
        }
    }

    /// Returns `true` while a delimiter prefix is pending at the end of the
    /// last chunk.
    pub const fn is_partial(&self) -> bool {
        matches!(self.state, ScanState::Partial(_))
    }

    pub const fn is_matched(&self) -> bool {
        matches!(self.state, ScanState::Matched)
    }

    /// Consumes `chunk` and returns the index right after the delimiter if it
    /// completes within this chunk.
    pub fn feed(&mut self, chunk: &[u8]) -> Option<usize> {
        let mut matched = match self.state {
            ScanState::Matched => return Some(0),
            ScanState::Scanning => 0,
            ScanState::Partial(n) => n,
        };

        for (i, &byte) in chunk.iter().enumerate() {
            while matched > 0 && self.delimiter[matched] != byte {
                matched = self.fallback[matched - 1];
            }
            if self.delimiter[matched] == byte {
                matched += 1;
            }
            if matched == self.delimiter.len() {
                self.state = ScanState::Matched;
                return Some(i + 1);
            }
        }

        self.state = if matched == 0 {
            ScanState::Scanning
        } else {
            ScanState::Partial(matched)
        };
        None
    }
}

/// `table[i]` is the length of the longest proper prefix of
/// `delimiter[..=i]` that is also its suffix.
fn prefix_table(delimiter: &[u8]) -> Vec<usize> {
    let mut table = vec![0; delimiter.len()];
    let mut k = 0;

    for i in 1..delimiter.len() {
        while k > 0 && delimiter[i] != delimiter[k] {
            k = table[k - 1];
        }
        if delimiter[i] == delimiter[k] {
            k += 1;
        }
        table[i] = k;
    }

    table
}

/// Discards bytes from `stream` up to and including `delimiter`.
///
/// Returns the unread remainder of the chunk in which the delimiter ended;
/// the stream itself is left positioned after that chunk.
pub async fn skip_past<S>(stream: &mut S, delimiter: &[u8]) -> Result<Bytes>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    let mut scanner = DelimiterScanner::new(delimiter);
    if scanner.is_matched() {
        return Ok(Bytes::new());
    }

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if let Some(end) = scanner.feed(&chunk) {
            return Ok(chunk.slice(end..));
        }
    }

    Err(DelimiterNotFound {
        delimiter: String::from_utf8_lossy(delimiter).into_owned(),
    }
    .into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<Bytes>> + Unpin {
        stream::iter(
            parts
                .iter()
                .copied()
                .map(|p| Ok(Bytes::from_static(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_feed_single_chunk() {
        let mut scanner = DelimiterScanner::new(b"ABC");
        assert_eq!(scanner.feed(b"xxABCyy"), Some(5));
        assert!(scanner.is_matched());
    }

    #[test]
    fn test_feed_tracks_partial_match_across_chunks() {
        let mut scanner = DelimiterScanner::new(b"ABCDE");
        assert_eq!(scanner.feed(b"..AB"), None);
        assert!(scanner.is_partial());
        assert_eq!(scanner.feed(b"CD"), None);
        assert!(scanner.is_partial());
        assert_eq!(scanner.feed(b"E..."), Some(1));
    }

    #[test]
    fn test_feed_resets_on_broken_partial() {
        let mut scanner = DelimiterScanner::new(b"ABCDE");
        assert_eq!(scanner.feed(b"ABC"), None);
        assert_eq!(scanner.feed(b"X"), None);
        assert!(!scanner.is_partial());
        assert_eq!(scanner.feed(b"DE"), None);
        assert_eq!(scanner.feed(b"ABCDE"), Some(5));
    }

    #[test]
    fn test_feed_overlapping_prefix() {
        // "AAB" inside "AAAB" only matches if the scanner falls back correctly
        let mut scanner = DelimiterScanner::new(b"AAB");
        assert_eq!(scanner.feed(b"AA"), None);
        assert_eq!(scanner.feed(b"AB"), Some(2));
    }

    #[test]
    fn test_feed_one_byte_per_chunk() {
        let delimiter = br#"[["auto","Detect language"]"#;
        let mut scanner = DelimiterScanner::new(delimiter);
        let document = br#"<script>var x = [["auto","Detect language"],["af","Afrikaans"]]"#;

        let end = document
            .iter()
            .enumerate()
            .find_map(|(i, b)| scanner.feed(std::slice::from_ref(b)).map(|_| i + 1))
            .unwrap();

        assert_eq!(&document[end..], br#",["af","Afrikaans"]]"#);
    }

    #[test]
    fn test_empty_delimiter_matches_immediately() {
        let mut scanner = DelimiterScanner::new(b"");
        assert!(scanner.is_matched());
        assert_eq!(scanner.feed(b"abc"), Some(0));
    }

    #[test]
    fn test_prefix_table() {
        assert_eq!(prefix_table(b"ABCDE"), vec![0, 0, 0, 0, 0]);
        assert_eq!(prefix_table(b"AABAA"), vec![0, 1, 0, 1, 2]);
    }

    #[tokio::test]
    async fn test_skip_past_split_over_three_reads() {
        let mut stream = chunks(&["noise AB", "CD", "Erest", " more"]);

        let leftover = skip_past(&mut stream, b"ABCDE").await.unwrap();
        assert_eq!(&leftover[..], b"rest");

        let next = stream.next().await.unwrap().unwrap();
        assert_eq!(&next[..], b" more");
    }

    #[tokio::test]
    async fn test_skip_past_delimiter_at_end_of_stream() {
        let mut stream = chunks(&["abc", "de", "XYZ"]);

        let leftover = skip_past(&mut stream, b"XYZ").await.unwrap();
        assert!(leftover.is_empty());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_skip_past_not_found() {
        let mut stream = chunks(&["abc", "AB", "CD"]);

        let err = skip_past(&mut stream, b"ABCDE").await.unwrap_err();
        assert!(err.downcast_ref::<DelimiterNotFound>().is_some());
        assert!(err.to_string().contains("ABCDE"));
    }

    #[tokio::test]
    async fn test_skip_past_propagates_stream_error() {
        let mut stream = stream::iter(vec![
            Ok(Bytes::from_static(b"AB")),
            Err(anyhow::anyhow!("connection reset")),
        ]);

        let err = skip_past(&mut stream, b"ABCDE").await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
