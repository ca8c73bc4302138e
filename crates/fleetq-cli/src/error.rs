use fleetq_config::error::ConfigError;
use fleetq_query::QueryError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error("Error while {action}")]
    #[diagnostic(code(fleetq::io), help("Check that the file exists and is readable"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON while {action}")]
    #[diagnostic(code(fleetq::json), help("Check the input against the expected JSON shape"))]
    JsonError {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(fleetq::toml))]
    TomlError(#[from] toml::ser::Error),

    #[error("Invalid field mapping `{0}`")]
    #[diagnostic(
        code(fleetq::invalid_mapping),
        help("Write mappings as ui_field=backend_field")
    )]
    InvalidMapping(String),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

/// Adds an action description to IO and JSON errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> CliResult<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> CliResult<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|source| {
            CliError::IoError {
                action: context(),
                source,
            }
        })
    }
}

impl<T> ErrorContext<T> for serde_json::Result<T> {
    fn with_context<C>(self, context: C) -> CliResult<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|source| {
            CliError::JsonError {
                action: context(),
                source,
            }
        })
    }
}
