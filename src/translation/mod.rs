pub mod chunker;
pub mod codec;
mod client;
mod language;
mod transport;

pub use client::{TranslationClient, TranslationRequest};
pub use codec::CodecError;
pub use language::{
    CatalogSources, LANGUAGE_LIST_SENTINEL, Language, LanguageCatalog, NATIVE_NAMES_SENTINEL,
    parse_language_list, parse_native_names,
};
pub use transport::{ByteStream, HttpTransport, Transport};
