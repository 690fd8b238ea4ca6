mod reader;

pub use reader::{DuplicateStdin, Input, InputReader, STDIN_ARG};
