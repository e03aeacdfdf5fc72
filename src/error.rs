//! Error types shared by the deploy and prepare-release tools.

use thiserror::Error;

/// Main error type for release tool operations.
#[derive(Error, Debug)]
pub enum ReleaseToolsError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("{0}")]
    MissingCredential(String),

    #[error(
        "Required environment variable {0} is not set. Unable to continue."
    )]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Lookup errors
    #[error("Can't find {kind} '{name}'")]
    NotFound { kind: String, name: String },

    #[error("Expected exactly one {kind} '{name}' but found {count}")]
    Ambiguous {
        kind: String,
        name: String,
        count: usize,
    },

    // Remote errors
    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("Registry operation failed: {0}")]
    RegistryError(String),

    #[error("Timed out after {seconds}s uploading {file}")]
    UploadTimeout { file: String, seconds: u64 },

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    // Parsing and rendering errors
    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using ReleaseToolsError
pub type Result<T> = std::result::Result<T, ReleaseToolsError>;

impl ReleaseToolsError {
    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create a registry error with context
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::RegistryError(msg.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }

    /// Create a not found error for the named entity
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create an error for a lookup that matched more than once
    pub fn ambiguous(
        kind: impl Into<String>,
        name: impl Into<String>,
        count: usize,
    ) -> Self {
        Self::Ambiguous {
            kind: kind.into(),
            name: name.into(),
            count,
        }
    }
}

// Generic I/O errors are wrapped in the Other variant
impl From<std::io::Error> for ReleaseToolsError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for ReleaseToolsError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            octocrab::Error::GitHub { source, .. }
                if source.status_code.as_u16() == 401
                    || source.status_code.as_u16() == 403 =>
            {
                Self::AuthenticationError(source.message.clone())
            }
            _ => Self::ForgeError(format!("GitHub API error: {}", err)),
        }
    }
}
