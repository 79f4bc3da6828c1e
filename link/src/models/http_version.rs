use serde::{Deserialize, Serialize};

/// HTTP protocol version to use for connections.
///
/// # Example
///
/// ```rust
/// use engine_link::{EngineLinkClient, HttpVersion};
///
/// let builder = EngineLinkClient::builder().http_version(HttpVersion::Http2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HttpVersion {
    /// HTTP/1.1 only - widely compatible
    #[serde(rename = "http1", alias = "http/1.1", alias = "1.1")]
    Http1,

    /// HTTP/2 with prior knowledge - the server must speak HTTP/2
    #[serde(rename = "http2", alias = "http/2", alias = "2")]
    Http2,

    /// Automatic (default) - negotiate via ALPN on TLS, HTTP/1.1 otherwise
    #[default]
    #[serde(rename = "auto")]
    Auto,
}

impl HttpVersion {
    /// Parse a config string; unknown values fall back to `Auto`
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "http1" | "http/1" | "http/1.1" | "1.1" => HttpVersion::Http1,
            "http2" | "http/2" | "2" => HttpVersion::Http2,
            _ => HttpVersion::Auto,
        }
    }
}
