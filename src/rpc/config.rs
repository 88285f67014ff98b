use std::time::Duration;

use url::Url;

/// Connection configuration for a [`JsonRpcCaller`](super::JsonRpcCaller).
///
/// The configuration is an owned value read by every call. Setters take
/// `&mut self`, so exclusive access is required to mutate it; sharing a
/// caller across threads while reconfiguring it needs external
/// synchronization. Mutation never affects a call already in flight.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    url: Url,
    read_timeout: Option<Duration>,
    allow_insecure_http: bool,
    trust_all_certs: bool,
    streaming_mode: bool,
}

impl EndpointConfig {
    /// Creates a configuration for the given service URL with no read
    /// timeout, insecure http disallowed, certificate verification on and
    /// streaming mode off.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            read_timeout: None,
            allow_insecure_http: false,
            trust_all_certs: false,
            streaming_mode: false,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The timeout between dispatching a request and receiving the response.
    ///
    /// `None` or a zero duration means no timeout.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout.filter(|t| !t.is_zero())
    }

    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) {
        self.read_timeout = timeout;
    }

    /// Whether credentials may be sent over plain `http` (vs `https`).
    pub fn is_insecure_http_allowed(&self) -> bool {
        self.allow_insecure_http
    }

    pub fn set_insecure_http_allowed(&mut self, allowed: bool) {
        self.allow_insecure_http = allowed;
    }

    /// Whether all TLS certificates, including self-signed ones, are trusted.
    pub fn is_all_certificates_trusted(&self) -> bool {
        self.trust_all_certs
    }

    pub fn set_all_certificates_trusted(&mut self, trust_all: bool) {
        self.trust_all_certs = trust_all;
    }

    /// Whether request bodies are staged to disk and streamed in chunks
    /// instead of buffered in memory. Not every deployment supports chunked
    /// requests.
    pub fn is_streaming_mode_on(&self) -> bool {
        self.streaming_mode
    }

    pub fn set_streaming_mode_on(&mut self, on: bool) {
        self.streaming_mode = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_read_timeout_means_no_timeout() {
        let mut config = EndpointConfig::new(Url::parse("https://example.org/services/narrative").unwrap());
        assert_eq!(config.read_timeout(), None);

        config.set_read_timeout(Some(Duration::ZERO));
        assert_eq!(config.read_timeout(), None);

        config.set_read_timeout(Some(Duration::from_secs(5)));
        assert_eq!(config.read_timeout(), Some(Duration::from_secs(5)));
    }
}
