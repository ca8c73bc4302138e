use fleetq_query::QueryError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(fleetq_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(fleetq_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(fleetq_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Configuration file already exists at {0}")]
    #[diagnostic(
        code(fleetq_config::already_exists),
        help("Remove the existing config file or pass a different --config path")
    )]
    ConfigAlreadyExists(String),

    #[error("Invalid page size: {0}")]
    #[diagnostic(
        code(fleetq_config::invalid_page_size),
        help("page_size must be between 1 and 500")
    )]
    InvalidPageSize(u32),

    #[error("Invalid base URL `{url}`: {source}")]
    #[diagnostic(
        code(fleetq_config::invalid_base_url),
        help("base_url must be an absolute URL such as http://localhost:8080")
    )]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unknown entity `{0}` in [fields]")]
    #[diagnostic(
        code(fleetq_config::unknown_entity),
        help("Keys under [fields] must be entity names such as targets or distribution-sets")
    )]
    UnknownEntity(String),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(fleetq_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error("IO error: {0}")]
    #[diagnostic(code(fleetq_config::io))]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
