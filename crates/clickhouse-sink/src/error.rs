//! Error types for the ClickHouse sink.

use std::fmt;
use thiserror::Error;

/// A structured exception reported by the ClickHouse server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteException {
    pub code: i32,
    pub message: String,
    pub stack_trace: String,
}

impl RemoteException {
    /// Parse the exception text ClickHouse returns in an error response.
    ///
    /// The text looks like
    /// `Code: 81. DB::Exception: Database foo does not exist. (UNKNOWN_DATABASE) (version 24.3.1.1)`,
    /// optionally followed by `Stack trace:` and the server-side trace.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix("Code:")?.trim_start();
        let (code, rest) = rest.split_once('.')?;
        let code = code.trim().parse().ok()?;

        let rest = rest.trim_start();
        let rest = rest.strip_prefix("DB::Exception:").unwrap_or(rest);
        let (message, stack_trace) = match rest.split_once("Stack trace:") {
            Some((message, trace)) => (message, trace.trim()),
            None => (rest, ""),
        };

        Some(Self {
            code,
            message: message.trim().to_string(),
            stack_trace: stack_trace.to_string(),
        })
    }
}

impl fmt::Display for RemoteException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Errors surfaced by a [`Store`](crate::Store) or its transactions.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Exception raised by the server.
    #[error("ClickHouse DB exception: {0}")]
    Remote(RemoteException),

    /// Transport or protocol error from the ClickHouse client.
    #[error("ClickHouse error: {0}")]
    ClickHouse(clickhouse::error::Error),

    /// A row could not be encoded for the store.
    #[error("Encoding error: {0}")]
    Encode(String),

    /// `execute` or `commit` called before `prepare`.
    #[error("statement was not prepared")]
    NotPrepared,

    /// The store refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// The server exception carried by this error, if any.
    pub fn remote_exception(&self) -> Option<&RemoteException> {
        match self {
            StoreError::Remote(exception) => Some(exception),
            _ => None,
        }
    }
}

impl From<clickhouse::error::Error> for StoreError {
    fn from(error: clickhouse::error::Error) -> Self {
        match &error {
            clickhouse::error::Error::BadResponse(text) => match RemoteException::parse(text) {
                Some(exception) => StoreError::Remote(exception),
                None => StoreError::ClickHouse(error),
            },
            _ => StoreError::ClickHouse(error),
        }
    }
}

/// Errors building a connection to the store.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The connection string is not a valid URL.
    #[error("invalid connection string: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The connection string uses a scheme the client cannot speak.
    #[error("unsupported scheme '{0}' (expected 'http')")]
    UnsupportedScheme(String),

    /// The connection string has no host.
    #[error("connection string has no host")]
    MissingHost,

    /// A query parameter could not be interpreted.
    #[error("invalid value '{value}' for parameter '{name}'")]
    InvalidParameter { name: String, value: String },
}

/// Liveness probing gave up.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("unable to ping ClickHouse DB for {attempts} times")]
    Unreachable {
        attempts: u32,
        #[source]
        last_error: Option<StoreError>,
    },
}

/// Stage of a batch write at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    Begin,
    Prepare,
    /// `row` is the 0-based position of the failing record in its batch.
    Execute { row: usize },
    Commit,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteStage::Begin => write!(f, "unable to begin bulk insert"),
            WriteStage::Prepare => write!(f, "unable to prepare insert statement"),
            WriteStage::Execute { row } => {
                write!(f, "unable to execute row {row} of bulk insert")
            }
            WriteStage::Commit => write!(f, "unable to commit bulk insert"),
        }
    }
}

/// A batch write failed; the whole batch is abandoned.
#[derive(Error, Debug)]
#[error("{stage} into '{table}'")]
pub struct WriteError {
    pub table: &'static str,
    pub stage: WriteStage,
    #[source]
    pub source: StoreError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_exception() {
        let text = "Code: 81. DB::Exception: Database biometrics does not exist. (UNKNOWN_DATABASE) (version 24.3.1.1)";
        let exception = RemoteException::parse(text).unwrap();

        assert_eq!(exception.code, 81);
        assert_eq!(
            exception.message,
            "Database biometrics does not exist. (UNKNOWN_DATABASE) (version 24.3.1.1)"
        );
        assert!(exception.stack_trace.is_empty());
    }

    #[test]
    fn test_parse_remote_exception_with_stack_trace() {
        let text = "Code: 516. DB::Exception: default: Authentication failed. Stack trace:\n\n0. DB::Exception::Exception()\n1. DB::TCPHandler::run()";
        let exception = RemoteException::parse(text).unwrap();

        assert_eq!(exception.code, 516);
        assert_eq!(exception.message, "default: Authentication failed.");
        assert!(exception.stack_trace.starts_with("0. DB::Exception::Exception()"));
        assert!(exception.stack_trace.ends_with("DB::TCPHandler::run()"));
    }

    #[test]
    fn test_parse_rejects_unstructured_text() {
        assert!(RemoteException::parse("connection reset by peer").is_none());
        assert!(RemoteException::parse("Code: abc. DB::Exception: x").is_none());
    }

    #[test]
    fn test_bad_response_becomes_remote() {
        let error: StoreError = clickhouse::error::Error::BadResponse(
            "Code: 60. DB::Exception: Table biometrics.control_objects does not exist. Stack trace:\n\n0. DB::Exception::Exception()".to_string(),
        )
        .into();

        let exception = error.remote_exception().unwrap();
        assert_eq!(exception.code, 60);
        assert_eq!(
            exception.message,
            "Table biometrics.control_objects does not exist."
        );
        assert_eq!(exception.stack_trace, "0. DB::Exception::Exception()");
    }

    #[test]
    fn test_other_client_errors_kept() {
        let error: StoreError =
            clickhouse::error::Error::BadResponse("502 Bad Gateway".to_string()).into();
        assert!(matches!(
            error,
            StoreError::ClickHouse(clickhouse::error::Error::BadResponse(_))
        ));

        let error: StoreError = clickhouse::error::Error::Custom("row too large".to_string()).into();
        assert!(matches!(error, StoreError::ClickHouse(_)));
        assert!(error.remote_exception().is_none());
    }

    #[test]
    fn test_write_error_message() {
        let error = WriteError {
            table: "control_objects",
            stage: WriteStage::Execute { row: 2 },
            source: StoreError::Unavailable("disk full".to_string()),
        };

        assert_eq!(
            error.to_string(),
            "unable to execute row 2 of bulk insert into 'control_objects'"
        );
    }
}
