//! Connection target, connection string and liveness probing.

use crate::error::{ConnectionError, ProbeError};
use crate::store::Store;
use std::time::Duration;
use url::Url;

/// Where and how to connect to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    /// Whole seconds; zero means no timeout.
    pub read_timeout: Duration,
    /// Whole seconds; zero means no timeout.
    pub write_timeout: Duration,
    pub debug: bool,
}

impl ConnectionTarget {
    /// Render the connection string, e.g.
    /// `http://127.0.0.1:8123?username=default&password=&database=biometrics&read_timeout=10&write_timeout=10&debug=false`.
    pub fn dsn(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("username", &self.username)
            .append_pair("password", &self.password)
            .append_pair("database", &self.database)
            .append_pair("read_timeout", &self.read_timeout.as_secs().to_string())
            .append_pair("write_timeout", &self.write_timeout.as_secs().to_string())
            .append_pair("debug", &self.debug.to_string())
            .finish();

        format!("http://{}:{}?{}", self.host, self.port, query)
    }

    /// Parse a connection string produced by [`ConnectionTarget::dsn`].
    ///
    /// Missing parameters fall back to an empty string, zero timeouts and
    /// `debug=false`; the port defaults to the HTTP interface port 8123 unless
    /// one is written out, including an explicit `:80`.
    pub fn from_dsn(dsn: &str) -> Result<Self, ConnectionError> {
        let url = Url::parse(dsn)?;
        if url.scheme() != "http" {
            return Err(ConnectionError::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(ConnectionError::MissingHost)?
            .to_string();

        let mut target = Self {
            host,
            port: url.port().unwrap_or_else(|| {
                if has_explicit_port(dsn) {
                    80
                } else {
                    DEFAULT_HTTP_PORT
                }
            }),
            username: String::new(),
            password: String::new(),
            database: String::new(),
            read_timeout: Duration::ZERO,
            write_timeout: Duration::ZERO,
            debug: false,
        };

        for (name, value) in url.query_pairs() {
            match &*name {
                "username" => target.username = value.into_owned(),
                "password" => target.password = value.into_owned(),
                "database" => target.database = value.into_owned(),
                "read_timeout" => target.read_timeout = parse_seconds(&name, &value)?,
                "write_timeout" => target.write_timeout = parse_seconds(&name, &value)?,
                "debug" => {
                    target.debug = value.parse().map_err(|_| invalid(&name, &value))?;
                }
                other => tracing::debug!("Ignoring unknown connection parameter '{}'", other),
            }
        }

        Ok(target)
    }

    /// Base URL of the HTTP interface.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Port of the ClickHouse HTTP interface.
pub const DEFAULT_HTTP_PORT: u16 = 8123;

/// `Url` drops a port equal to the scheme default, so look at the authority
/// as written.
fn has_explicit_port(dsn: &str) -> bool {
    let authority = dsn
        .split_once("://")
        .map_or(dsn, |(_, rest)| rest)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    // Skip a bracketed IPv6 host
    let after_host = match host_port.strip_prefix('[') {
        Some(rest) => rest.split_once(']').map_or("", |(_, tail)| tail),
        None => host_port,
    };

    after_host
        .split_once(':')
        .is_some_and(|(_, port)| !port.is_empty())
}

fn parse_seconds(name: &str, value: &str) -> Result<Duration, ConnectionError> {
    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| invalid(name, value))
}

fn invalid(name: &str, value: &str) -> ConnectionError {
    ConnectionError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
    }
}

/// Logged in place of a connection string that does not parse.
const UNPARSABLE_DSN: &str = "<unparsable connection string>";

/// Mask the password in a connection string for safe logging.
///
/// Both the `password` query parameter and a `user:password@` userinfo are
/// masked. A string that does not parse is never echoed back.
pub fn mask_dsn_password(dsn: &str) -> String {
    let Ok(mut url) = Url::parse(dsn) else {
        return UNPARSABLE_DSN.to_string();
    };

    if url.password().is_some_and(|p| !p.is_empty()) && url.set_password(Some("***")).is_err() {
        return UNPARSABLE_DSN.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "password" && !value.is_empty() {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    if pairs.is_empty() {
        return url.to_string();
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}

/// Ping the store until it answers, at most `max_attempts` times.
///
/// Attempts follow each other without delay. Each failure is logged with its
/// attempt number; server exceptions are logged with code, message and trace.
pub async fn probe<S: Store>(store: &S, max_attempts: u32) -> Result<(), ProbeError> {
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match store.ping().await {
            Ok(()) => {
                if attempt > 1 {
                    tracing::info!("ClickHouse DB answered after {} attempts", attempt);
                }
                return Ok(());
            }
            Err(e) => {
                match e.remote_exception() {
                    Some(exception) => tracing::warn!(
                        "ClickHouse DB exception (attempt {}/{}): [{}] {}\n{}",
                        attempt,
                        max_attempts,
                        exception.code,
                        exception.message,
                        exception.stack_trace
                    ),
                    None => tracing::warn!(
                        "Unable to ping ClickHouse DB (attempt {}/{}): {}",
                        attempt,
                        max_attempts,
                        e
                    ),
                }
                last_error = Some(e);
            }
        }
    }

    Err(ProbeError::Unreachable {
        attempts: max_attempts,
        last_error,
    })
}
