use anyhow::{Context, Result, bail};
use std::pin::Pin;
use tokio::fs::File;
use tokio::io::{self, AsyncRead, AsyncReadExt};

/// Argument naming standard input.
pub const STDIN_ARG: &str = "-";

/// A boxed input source.
pub type Input = Pin<Box<dyn AsyncRead + Send>>;

/// Raised when `-` appears more than once among the inputs.
#[derive(Debug, thiserror::Error)]
#[error("stdin (\"-\") already specified")]
pub struct DuplicateStdin;

pub struct InputReader;

impl InputReader {
    /// Opens `files` in order as one continuous stream.
    ///
    /// `-` stands for stdin and may appear once; no files means stdin.
    pub async fn open(files: &[String]) -> Result<Input> {
        if files.is_empty() {
            return Ok(Box::pin(io::stdin()));
        }

        let mut input: Input = Box::pin(io::empty());
        let mut had_stdin = false;

        for path in files {
            let next: Input = if path == STDIN_ARG {
                if had_stdin {
                    bail!(DuplicateStdin);
                }
                had_stdin = true;
                Box::pin(io::stdin())
            } else {
                let file = File::open(path)
                    .await
                    .with_context(|| format!("Failed to open file: {path}"))?;
                Box::pin(file)
            };
            input = Box::pin(input.chain(next));
        }

        Ok(input)
    }
}
