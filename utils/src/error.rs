use std::fmt;
use std::sync::PoisonError;

pub type Result<T> = std::result::Result<T, Error>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Crate-wide error: a human readable message plus the underlying cause, if any.
#[derive(thiserror::Error)]
#[error("{message}")]
pub struct Error {
    message: String,
    #[source]
    source: Option<BoxedSource>,
}

impl Error {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            source: None,
        }
    }

    pub fn with_source(message: &str, source: BoxedSource) -> Self {
        Self {
            message: message.to_string(),
            source: Some(source),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {}", self.message, source),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source("I/O error", Box::new(err))
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::with_source("Configuration error", Box::new(err))
    }
}

impl From<log::SetLoggerError> for Error {
    fn from(err: log::SetLoggerError) -> Self {
        Error::with_source("Failed to install the log bridge", Box::new(err))
    }
}

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Error::new(&format!("Lock poisoned: {}", err))
    }
}
