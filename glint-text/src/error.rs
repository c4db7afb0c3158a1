use thiserror::Error;

/// Errors raised by the layout core.
///
/// Missing glyphs and degenerate geometry are not errors; they are
/// absorbed by the layout pass itself.
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Cannot pop the last entry of the options stack")]
    OptionsStackUnderflow,
    #[error("Invalid render options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
    #[error("Invalid value for '{field}': {reason}")]
    InvalidOptionValue {
        field: &'static str,
        reason: String,
    },
}
