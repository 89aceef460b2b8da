//! Errors raised while parsing a command line.
use thiserror::Error;

/// Flag parsing failure for one command node.
///
/// `run` wraps this in an `anyhow::Error`; callers that need to tell parse
/// failures apart from handler failures can `downcast_ref::<ParseError>()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A flag that no registered option accepts
    #[error("flag provided but not defined: {0}")]
    UnknownFlag(String),

    /// A value that could not be coerced to the option's kind
    #[error("invalid value \"{value}\" for flag {flag}: {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },

    /// An integer or string flag given without a value
    #[error("flag needs an argument: {0}")]
    MissingValue(String),

    /// `-h`/`--help` on a command that does not define its own `help` option
    #[error("flag: help requested")]
    HelpRequested,

    /// Anything else the engine rejected
    #[error("{0}")]
    Malformed(String),
}
