use std::fmt;

/// Result type for p4bridge-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the connection layer
#[derive(Debug)]
pub enum Error {
    /// The engine could not establish a session; the partial handle has
    /// already been torn down
    Initialization(String),

    /// A login probe rejected the supplied credentials
    InvalidLogin(String),

    /// A command run failed (callback failure, engine failure, or the
    /// exception policy converting the result)
    Run(p4bridge_protocol::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Initialization(msg) => write!(f, "connection error: {}", msg),
            Error::InvalidLogin(msg) => write!(f, "invalid login: {}", msg),
            Error::Run(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Run(err) => Some(err),
            Error::Initialization(_) | Error::InvalidLogin(_) => None,
        }
    }
}

impl From<p4bridge_protocol::Error> for Error {
    fn from(err: p4bridge_protocol::Error) -> Self {
        Error::Run(err)
    }
}
