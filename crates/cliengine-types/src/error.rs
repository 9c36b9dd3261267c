//! Error types for cliengine.
//!
//! Three layers: [`RegistrationError`] is fatal at startup, [`BindError`] is
//! recoverable and surfaced to the end user, and [`EngineError`] wraps
//! everything else (handler faults, persistence, configuration).

use std::io;

use serde::Serialize;

/// Errors raised while registering a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("duplicate command name: {0}")]
    DuplicateName(String),

    #[error("command '{command}' overlaps signature ({signature}) of command '{existing}'")]
    OverlappingSignature {
        command: String,
        existing: String,
        signature: String,
    },

    #[error("'{0}' is a built-in command")]
    ReservedName(String),

    #[error("command name must not be empty")]
    EmptyName,

    #[error("command '{command}' declares argument '{argument}' more than once")]
    DuplicateArgument { command: String, argument: String },

    #[error("default of argument '{argument}' in command '{command}' does not match its type")]
    InvalidDefault { command: String, argument: String },

    #[error("required argument '{argument}' in command '{command}' follows an optional one")]
    RequiredAfterOptional { command: String, argument: String },
}

/// Errors raised while binding argument tokens to a command's specs.
///
/// Serialized with a `kind` tag so it can travel inside an
/// `invalid_argument` result object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindError {
    #[error("missing argument '{argument}'")]
    MissingArgument { argument: String },

    #[error("invalid value '{token}' for argument '{argument}' (expected {expected})")]
    InvalidArgument {
        argument: String,
        token: String,
        expected: String,
    },

    #[error("too many arguments: expected at most {expected}, got {given}")]
    TooManyArguments { expected: usize, given: usize },
}

impl BindError {
    /// Name of the offending argument, if the error concerns one.
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::MissingArgument { argument } | Self::InvalidArgument { argument, .. } => {
                Some(argument)
            },
            Self::TooManyArguments { .. } => None,
        }
    }
}

/// Errors produced by the cliengine framework.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("bind error: {0}")]
    Bind(#[from] BindError),

    #[error("handler error: {0}")]
    Handler(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, EngineError>;
