use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

#[derive(Debug)]
pub enum Error {
    /// The transport produced no server response at all (refused connection,
    /// DNS failure, timeout).
    NoResponse,
    /// The server answered with an OperationOutcome error payload, rendered
    /// as one `severity code diagnostics` line per issue.
    Protocol(String),
    /// Any other non-2xx response, with the decoded body attached.
    Http(StatusCode, Value),
    /// A refresh was attempted while the state holds no refresh token.
    NoRefreshToken,
    Config(String),
    Json(serde_json::Error),
}

impl Error {
    /// Status code of the server response behind this error, if one exists.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http(status, _) => Some(*status),
            _ => None,
        }
    }

    /// Decoded response body behind this error, if one exists.
    pub fn response_body(&self) -> Option<&Value> {
        match self {
            Error::Http(_, body) => Some(body),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoResponse => write!(f, "No response received from the FHIR server"),
            Error::Protocol(message) => write!(f, "{message}"),
            Error::Http(status, _) => write!(f, "Server responded with {status}"),
            Error::NoRefreshToken => {
                write!(f, "Trying to refresh but there is no refresh token")
            }
            Error::Config(message) => write!(f, "{message}"),
            Error::Json(err) => write!(f, "Failed to decode JSON payload: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
