//! Shared HTTP client setup

use mctoy_core::{Error, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use std::time::Duration;

/// User agent sent to every provider (Nominatim rejects anonymous clients)
pub const USER_AGENT: &str = concat!("mctoy/", env!("CARGO_PKG_VERSION"));

/// Characters left alone by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Client settings shared by all adapters
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Per-request timeout. `None` waits as long as the server does.
    pub timeout: Option<Duration>,
}

/// Build a reqwest client from config
pub fn build_client(config: &ClientConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| Error::Transport(format!("building HTTP client: {}", e)))
}

/// Percent-encode a single URL component
pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Map a reqwest failure onto the core error taxonomy
pub(crate) fn request_error(err: reqwest::Error) -> Error {
    if err.is_decode() {
        Error::MalformedResponse(err.to_string())
    } else {
        Error::Transport(err.to_string())
    }
}

/// Trim a trailing slash so paths can be appended with `format!`
pub(crate) fn base_url(url: impl Into<String>) -> String {
    let mut url = url.into();
    while url.ends_with('/') {
        url.pop();
    }
    url
}
