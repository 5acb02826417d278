use std::fmt;

/// Error types for UD capture parsing
#[derive(Debug)]
pub enum UdError {
    /// I/O errors while reading the capture or writing exports
    Io(std::io::Error),
    /// Nothing usable was recovered from the capture
    EmptyInput(String),
    /// Structurally malformed data (bounded read past the end of the buffer)
    Malformed(String),
    /// Parser configuration rejected before parsing
    InvalidConfig(String),
    /// Export format error
    Export(String),
}

impl fmt::Display for UdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UdError::Io(err) => write!(f, "I/O error: {}", err),
            UdError::EmptyInput(msg) => write!(f, "{}", msg),
            UdError::Malformed(msg) => write!(f, "Malformed capture: {}", msg),
            UdError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            UdError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for UdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UdError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for UdError {
    fn from(err: std::io::Error) -> Self {
        UdError::Io(err)
    }
}

impl From<anyhow::Error> for UdError {
    fn from(err: anyhow::Error) -> Self {
        UdError::Malformed(err.to_string())
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for UdError {
    fn from(err: csv::Error) -> Self {
        UdError::Export(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for UdError {
    fn from(err: serde_json::Error) -> Self {
        UdError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UdError>;
