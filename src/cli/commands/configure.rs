//! Configure command handler for the config file.

use anyhow::Result;

use crate::config::{AUTO_DETECT, ConfigFile, ConfigManager};
use crate::ui::Style;

/// Runs the configure command.
///
/// With `show`, prints the effective configuration. Otherwise writes a
/// config file with default settings unless one already exists.
pub fn run_configure(show: bool) -> Result<()> {
    let manager = ConfigManager::new()?;

    if show {
        let config = manager.load_or_default()?;
        print_config(&manager, &config);
        return Ok(());
    }

    if manager.exists() {
        crate::warn!(
            "{} Config file already exists: {}",
            Style::warning("!"),
            Style::secondary(manager.config_path().display())
        );
        return Ok(());
    }

    manager.save(&ConfigFile::default())?;
    crate::status!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display())
    );
    crate::status!(
        "  Set {} under {} to choose a default target language.",
        Style::code("to"),
        Style::code("[gtrans]")
    );

    Ok(())
}

fn print_config(manager: &ConfigManager, config: &ConfigFile) {
    let not_set = || Style::secondary("(not set)");

    println!("{}", Style::header("Configuration"));
    println!(
        "  {}              {}",
        Style::label("file"),
        if manager.exists() {
            Style::value(manager.config_path().display())
        } else {
            Style::secondary(format!("{} (missing)", manager.config_path().display()))
        }
    );
    println!(
        "  {}              {}",
        Style::label("from"),
        config
            .gtrans
            .from
            .as_deref()
            .map_or_else(|| Style::secondary(format!("{AUTO_DETECT} (default)")), Style::value)
    );
    println!(
        "  {}                {}",
        Style::label("to"),
        config
            .gtrans
            .to
            .as_deref()
            .map_or_else(not_set, Style::value)
    );
    println!();

    let endpoint = &config.endpoint;
    println!("{}", Style::header("Endpoint"));
    println!(
        "  {}     {}",
        Style::label("translate_url"),
        Style::value(&endpoint.translate_url)
    );
    println!(
        "  {}     {}",
        Style::label("languages_url"),
        Style::value(&endpoint.languages_url)
    );
    println!(
        "  {}  {}",
        Style::label("native_names_url"),
        Style::value(&endpoint.native_names_url)
    );
    println!(
        "  {}        {}",
        Style::label("user_agent"),
        Style::value(&endpoint.user_agent)
    );
    println!(
        "  {}      {}s",
        Style::label("timeout_secs"),
        Style::value(endpoint.timeout_secs)
    );
}
