mod manager;

pub use manager::{
    AUTO_DETECT, ConfigFile, ConfigManager, DEFAULT_LANGUAGES_URL, DEFAULT_NATIVE_NAMES_URL,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TRANSLATE_URL, DEFAULT_USER_AGENT, EndpointConfig, GtransConfig,
    MissingTargetLanguage, ResolveOptions, ResolvedConfig, resolve_config,
};
