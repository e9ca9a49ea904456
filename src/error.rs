use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type ConfigError = Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Generator error: {0}")]
    Generator(String),

    #[error("Link rewrite error: {0}")]
    LinkRewrite(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::LinkRewrite(err.to_string())
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io(err.error)
    }
}

impl Error {
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::InvalidFilename(_) | Error::NotFound(_)
        )
    }
}
