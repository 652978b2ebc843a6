// Error handling for the plot stream decoders and renderers

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Truncated stream: needed {needed} bytes at offset {offset}, only {available} available")]
    TruncatedStream {
        offset: usize,
        needed: u64,
        available: usize,
    },

    #[error("Invalid UTF-8 string: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("{0}-byte floating point values are not currently supported")]
    UnsupportedWidth(u8),

    #[error("Invalid panel shape: {rows}x{cols}")]
    InvalidShape { rows: i64, cols: i64 },

    #[error("Unexpected argument count: {0}")]
    ArgumentCount(String),

    #[error("{0}")]
    Usage(clap::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<clap::Error> for PlotError {
    fn from(err: clap::Error) -> Self {
        use clap::error::ErrorKind;

        match err.kind() {
            ErrorKind::MissingRequiredArgument
            | ErrorKind::MissingSubcommand
            | ErrorKind::TooManyValues
            | ErrorKind::TooFewValues
            | ErrorKind::WrongNumberOfValues => {
                PlotError::ArgumentCount(err.to_string().trim().to_string())
            }
            ErrorKind::UnknownArgument if is_extra_positional(&err) => {
                PlotError::ArgumentCount(err.to_string().trim().to_string())
            }
            _ => PlotError::Usage(err),
        }
    }
}

// clap reports a surplus positional as an unknown argument without a dash.
fn is_extra_positional(err: &clap::Error) -> bool {
    use clap::error::{ContextKind, ContextValue};

    matches!(
        err.get(ContextKind::InvalidArg),
        Some(ContextValue::String(arg)) if !arg.starts_with('-')
    )
}

impl PlotError {
    /// True for the failures a decode pass can produce.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            PlotError::TruncatedStream { .. }
                | PlotError::InvalidEncoding(_)
                | PlotError::UnsupportedWidth(_)
                | PlotError::InvalidShape { .. }
        )
    }
}
