use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gtrans")]
#[command(about = "Translate text of any length with the Google Translate web endpoint")]
#[command(version)]
pub struct Args {
    /// Files to translate, in order ("-" for stdin; stdin if none given)
    pub files: Vec<String>,

    /// Source language code (default: auto-detect)
    #[arg(short = 'f', long = "from")]
    pub from: Option<String>,

    /// Target language code (e.g., ja, en, zh-CN)
    #[arg(short = 't', long = "to")]
    pub to: Option<String>,

    /// Suppress non-essential output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Log each request to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config file, or show the current configuration
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// List the languages the endpoint supports
    Languages {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
}
