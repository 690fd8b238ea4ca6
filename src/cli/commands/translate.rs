use anyhow::Result;
use tokio::io;

use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::input::InputReader;
use crate::translation::{HttpTransport, TranslationClient};

pub struct TranslateOptions {
    pub files: Vec<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Translates the given files (or stdin) and streams the result to stdout.
pub async fn run_translate(options: TranslateOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default()?;
    let resolved = resolve_config(
        &ResolveOptions {
            from: options.from,
            to: options.to,
        },
        &config_file,
    )?;

    crate::verbose!(
        "Translating {} -> {} via {}",
        resolved.source_language,
        resolved.target_language,
        resolved.endpoint.translate_url
    );

    let input = InputReader::open(&options.files).await?;
    let transport = HttpTransport::new(&resolved.endpoint)?;
    let client = TranslationClient::new(transport, resolved.endpoint.translate_url.clone());

    let mut stdout = io::stdout();
    client
        .translate(
            input,
            &mut stdout,
            &resolved.source_language,
            &resolved.target_language,
        )
        .await
}
