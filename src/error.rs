use http::StatusCode;

/// Errors while decoding or parsing a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The decoded bytes are not valid utf-8. `valid_up_to` is the offset of the first invalid
    /// byte in the decoded output.
    InvalidEncoding { valid_up_to: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidEncoding { valid_up_to } => {
                write!(f, "Invalid utf-8 after byte {valid_up_to}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors while reading a query from a `RequestSource`.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),

    InvalidContentLength(String),
    BodyTooLarge { declared: usize, limit: usize },

    Parse(ParseError),
}

impl Error {
    /// The status a request handler should respond with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,

            Error::InvalidContentLength(_) => StatusCode::BAD_REQUEST,
            Error::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,

            Error::Parse(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "Failed to read request: {e}"),

            Error::InvalidContentLength(value) => write!(f, "Invalid Content-Length '{value}'"),
            Error::BodyTooLarge { declared, limit } => {
                write!(f, "Body of {declared} bytes exceeds limit of {limit} bytes")
            }

            Error::Parse(e) => write!(f, "Malformed query: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<ParseError> for Error {
    fn from(value: ParseError) -> Self {
        Error::Parse(value)
    }
}
