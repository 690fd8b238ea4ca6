//! The list of languages the endpoint supports, with their native names.

use anyhow::{Context, Result};
use futures_util::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::OnceCell;

use super::transport::{ByteStream, Transport};
use crate::scan;

/// Start of the language array embedded in the translate web page.
pub const LANGUAGE_LIST_SENTINEL: &[u8] = br#"[["auto","Detect language"]"#;

/// Assignment preceding the native-name object literal in the localization script.
pub const NATIVE_NAMES_SENTINEL: &[u8] = b"window.LanguageDisplays.nativeNames = {";

/// A language supported by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub english_name: String,
    /// The language's name for itself; empty when unknown.
    pub endonym: String,
}

/// Where the two catalog documents live.
#[derive(Debug, Clone)]
pub struct CatalogSources {
    pub languages_url: String,
    pub native_names_url: String,
}

/// Fetches the language list once and serves it from memory afterwards.
///
/// The cache is either unfetched or holds the first successful fetch, which
/// always starts with the `auto` entry. A failed fetch leaves it unfetched.
/// Concurrent first calls share a single fetch.
pub struct LanguageCatalog {
    sources: CatalogSources,
    languages: OnceCell<Vec<Language>>,
}

impl LanguageCatalog {
    pub fn new(sources: CatalogSources) -> Self {
        Self {
            sources,
            languages: OnceCell::new(),
        }
    }

    /// Returns `true` once a fetch has succeeded.
    pub fn is_fetched(&self) -> bool {
        self.languages.initialized()
    }

    pub async fn languages<T: Transport>(&self, transport: &T) -> Result<&[Language]> {
        let languages = self
            .languages
            .get_or_try_init(|| fetch_languages(transport, &self.sources))
            .await?;

        Ok(languages)
    }
}

async fn fetch_languages<T: Transport>(
    transport: &T,
    sources: &CatalogSources,
) -> Result<Vec<Language>> {
    crate::verbose!("Fetching language list from {}", sources.languages_url);
    let page = transport.get(&sources.languages_url).await?;
    let names = parse_language_list(page)
        .await
        .context("Could not find list of languages")?;

    crate::verbose!("Fetching native names from {}", sources.native_names_url);
    let script = transport.get(&sources.native_names_url).await?;
    let endonyms = parse_native_names(script)
        .await
        .context("Could not find native language names")?;

    Ok(merge(names, &endonyms))
}

/// Decodes the `[code, English name]` pairs following [`LANGUAGE_LIST_SENTINEL`].
pub async fn parse_language_list(mut page: ByteStream) -> Result<Vec<(String, String)>> {
    let leftover = scan::skip_past(&mut page, LANGUAGE_LIST_SENTINEL).await?;

    let mut document = LANGUAGE_LIST_SENTINEL.to_vec();
    document.extend_from_slice(&leftover);
    let document = scan::read_to_end(&document, page).await?;

    first_json_value(&document)
}

/// Decodes the single-quoted object literal following [`NATIVE_NAMES_SENTINEL`].
pub async fn parse_native_names(mut script: ByteStream) -> Result<HashMap<String, String>> {
    let leftover = scan::skip_past(&mut script, NATIVE_NAMES_SENTINEL).await?;

    let rest = stream::once(async move { Ok(leftover) }).chain(script);
    let document = scan::read_to_end(b"{", scan::normalize_quotes(rest)).await?;

    first_json_value(&document)
}

/// Decodes the first JSON value in `document`, ignoring whatever follows it.
fn first_json_value<T: serde::de::DeserializeOwned>(document: &[u8]) -> Result<T> {
    serde_json::Deserializer::from_slice(document)
        .into_iter::<T>()
        .next()
        .context("Document ended before any JSON value")?
        .context("Failed to decode embedded JSON")
}

fn merge(names: Vec<(String, String)>, endonyms: &HashMap<String, String>) -> Vec<Language> {
    names
        .into_iter()
        .map(|(code, english_name)| Language {
            endonym: endonyms.get(&code).cloned().unwrap_or_default(),
            code,
            english_name,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PAGE: &str = concat!(
        "<html><script>AF_initDataCallback({data:",
        r#"[[["auto","Detect language"],["en","English"],["es","Spanish"],["qx","Test"]],"#,
        r#"[["en","English"]]]});</script></html>"#,
    );

    const SCRIPT: &str = concat!(
        "window.LanguageDisplays = {};\n",
        "window.LanguageDisplays.nativeNames = {'en':'English','es':'Español','auto':'Auto'};\n",
        "window.LanguageDisplays.other = {'x':'y'};\n",
    );

    fn split_stream(document: &str, size: usize) -> ByteStream {
        let chunks: Vec<Result<Bytes>> = document
            .as_bytes()
            .chunks(size)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        Box::pin(futures_util::stream::iter(chunks))
    }

    struct DocumentTransport {
        page: &'static str,
        script: &'static str,
        gets: AtomicUsize,
    }

    impl DocumentTransport {
        fn new(page: &'static str, script: &'static str) -> Self {
            Self {
                page,
                script,
                gets: AtomicUsize::new(0),
            }
        }
    }

    impl Transport for DocumentTransport {
        async fn post_form(&self, _url: &str, _body: String) -> Result<Bytes> {
            anyhow::bail!("unexpected POST")
        }

        async fn get(&self, url: &str) -> Result<ByteStream> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            match url {
                "page" => Ok(split_stream(self.page, 7)),
                "script" => Ok(split_stream(self.script, 7)),
                _ => anyhow::bail!("unknown url {url}"),
            }
        }
    }

    fn catalog() -> LanguageCatalog {
        LanguageCatalog::new(CatalogSources {
            languages_url: "page".to_string(),
            native_names_url: "script".to_string(),
        })
    }

    #[tokio::test]
    async fn test_parse_language_list() {
        let names = parse_language_list(split_stream(PAGE, 5)).await.unwrap();

        assert_eq!(names.len(), 4);
        assert_eq!(names[0], ("auto".to_string(), "Detect language".to_string()));
        assert_eq!(names[2], ("es".to_string(), "Spanish".to_string()));
    }

    #[tokio::test]
    async fn test_parse_language_list_missing_sentinel() {
        let err = parse_language_list(split_stream("<html>nothing here</html>", 4))
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<scan::DelimiterNotFound>().is_some());
    }

    #[tokio::test]
    async fn test_parse_native_names() {
        let names = parse_native_names(split_stream(SCRIPT, 3)).await.unwrap();

        assert_eq!(names.len(), 3);
        assert_eq!(names["es"], "Español");
    }

    #[tokio::test]
    async fn test_languages_merges_endonyms() {
        let transport = DocumentTransport::new(PAGE, SCRIPT);
        let catalog = catalog();

        let languages = catalog.languages(&transport).await.unwrap();

        assert_eq!(languages.len(), 4);
        assert_eq!(
            languages[2],
            Language {
                code: "es".to_string(),
                english_name: "Spanish".to_string(),
                endonym: "Español".to_string(),
            }
        );
        assert_eq!(languages[3].endonym, "");
    }

    #[tokio::test]
    async fn test_languages_fetched_only_once() {
        let transport = DocumentTransport::new(PAGE, SCRIPT);
        let catalog = catalog();
        assert!(!catalog.is_fetched());

        let first = catalog.languages(&transport).await.unwrap().to_vec();
        assert_eq!(transport.gets.load(Ordering::SeqCst), 2);

        let second = catalog.languages(&transport).await.unwrap();
        assert_eq!(transport.gets.load(Ordering::SeqCst), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let transport = DocumentTransport::new("no languages", SCRIPT);
        let catalog = catalog();

        assert!(catalog.languages(&transport).await.is_err());
        assert!(!catalog.is_fetched());
        assert!(catalog.languages(&transport).await.is_err());
        assert_eq!(transport.gets.load(Ordering::SeqCst), 2);
    }
}
