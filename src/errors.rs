use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input. Carries a message naming the offending text.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// Helper trait to turn foreign errors into InvalidArgument with a message
pub trait ResultExt<T> {
    fn context(self, context: &str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn context(self, context: &str) -> Result<T> {
        self.map_err(|_| Error::InvalidArgument(context.to_string()))
    }
}

impl<T> ResultExt<T> for Option<T> {
    fn context(self, context: &str) -> Result<T> {
        self.ok_or_else(|| Error::InvalidArgument(context.to_string()))
    }
}
