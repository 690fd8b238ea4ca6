//! Lists the languages the translation endpoint supports.

use anyhow::Result;

use crate::config::ConfigManager;
use crate::translation::{HttpTransport, Language, LanguageCatalog};
use crate::ui::{Spinner, Style};

/// Fetches the language catalog and prints it as a table or JSON.
pub async fn run_languages(json: bool) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default()?;
    let endpoint = config_file.endpoint;

    let transport = HttpTransport::new(&endpoint)?;
    let catalog = LanguageCatalog::new(endpoint.catalog_sources());

    let spinner = Spinner::new("Fetching languages...");
    let languages = catalog.languages(&transport).await;
    spinner.stop();
    let languages = languages?;

    if json {
        println!("{}", serde_json::to_string_pretty(languages)?);
    } else {
        print_table(languages);
    }

    Ok(())
}

fn print_table(languages: &[Language]) {
    let code_width = column_width(languages, |l| &l.code);
    let name_width = column_width(languages, |l| &l.english_name);

    println!("{}", Style::header("Supported languages"));
    println!();
    for language in languages {
        println!(
            "  {}  {}  {}",
            Style::code(pad(&language.code, code_width)),
            Style::value(pad(&language.english_name, name_width)),
            Style::secondary(&language.endonym)
        );
    }
}

fn column_width(languages: &[Language], field: impl Fn(&Language) -> &str) -> usize {
    languages
        .iter()
        .map(|l| field(l).chars().count())
        .max()
        .unwrap_or(0)
}

fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}
