//! # gtrans - Streaming Google Translate CLI
//!
//! `gtrans` translates text of any length through the public Google
//! Translate web endpoint. Input is cut into segments below the endpoint's
//! size limit at line boundaries, translated one request at a time, and
//! written out as each segment comes back.
//!
//! ## Features
//!
//! - **Unbounded input**: Files and stdin are streamed, never loaded whole
//! - **Order preserving**: Output segments appear in input order
//! - **Language catalog**: `gtrans languages` lists codes with English and native names
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a file to Japanese
//! gtrans --to ja ./notes.md
//!
//! # Translate stdin, forcing the source language
//! cat report.md | gtrans --from en --to de
//!
//! # Several inputs in order, stdin in the middle
//! gtrans --to fr intro.txt - outro.txt
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/gtrans/config.toml`:
//!
//! ```toml
//! [gtrans]
//! to = "ja"
//!
//! [endpoint]
//! timeout_secs = 30
//! ```

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and endpoint settings.
pub mod config;

/// Input reading from files and stdin.
pub mod input;

/// Global output configuration (quiet/verbose modes, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Byte-stream scanning helpers (delimiter search, quote normalization).
pub mod scan;

/// Translation client, wire codec, and language catalog.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;
