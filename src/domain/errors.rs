use thiserror::Error;

/// Invariant violations on the monetary value objects and the pair enumerator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("[{left} - {right}]: amounts with different symbols cannot be combined, convert through the conversion pipeline first")]
    SymbolMismatch { left: String, right: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<ValidationError> for String {
    fn from(error: ValidationError) -> Self {
        error.to_string()
    }
}

/// Raised when the conversion pipeline is asked for something it must never do.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Cannot convert from '{from}' to '{to}': a conversion between identical symbols is a no-op, only request conversions into a different target symbol")]
    InvalidOperation { from: String, to: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error, Clone)]
pub enum ImporterError {
    #[error("Failed to read import source {path}: {reason}")]
    SourceUnavailable { path: String, reason: String },

    #[error("Failed to parse import data from {source_name}: {reason}")]
    ParseError { source_name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache serialization error at {path}: {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing configuration value: {0}")]
    Missing(&'static str),
}

/// Top level error for ledger runs.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Importer(#[from] ImporterError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
