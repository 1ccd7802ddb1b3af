//! Error types for rowbind

use thiserror::Error;

/// Result type alias for rowbind operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by user code run during construction.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while binding, mapping or executing statements
#[derive(Error, Debug)]
pub enum Error {
    /// MySQL driver error
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// Type conversion error
    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversion {
        expected: &'static str,
        actual: String,
    },

    /// Column not found in row
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Null value for non-optional field
    #[error("Unexpected null value for column: {0}")]
    UnexpectedNull(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A method parameter has no name and cannot be bound by name
    #[error("Parameter #{0} was not given a name and no name metadata is available for it")]
    Naming(usize),

    /// No column decoder registered for a declared type
    #[error("No column decoder for {0}")]
    NoDecoder(&'static str),

    /// A required constructor parameter has no value
    #[error("No argument provided for required parameter `{parameter}` of {target}")]
    MissingArgument {
        target: &'static str,
        parameter: String,
    },

    /// Any failure raised while reconstructing a target instance
    #[error("Unable to map {target} entity: {source}")]
    Mapping {
        target: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// The target type has no designated constructor
    #[error("{0} has no designated constructor to map rows into")]
    NoPrimaryConstructor(&'static str),

    /// Error returned from a constructor validation hook
    #[error("Constructor failed: {0}")]
    Constructor(#[source] BoxError),

    /// A statement placeholder was never bound
    #[error("No value bound for statement parameter `{0}`")]
    UnboundParameter(String),
}

impl Error {
    /// Wrap `cause` as a mapping error for `target`.
    pub fn mapping(target: &'static str, cause: Error) -> Self {
        Error::Mapping {
            target,
            source: Box::new(cause),
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
