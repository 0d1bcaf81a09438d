//! HTTP transfer sessions
//!
//! A session pairs a transfer configuration with an owned output sink.
//! `execute` streams the response into the sink chunk by chunk, so a
//! failed transfer keeps whatever bytes arrived before the failure and a
//! re-perform keeps appending until the sink is explicitly reset.

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::Method;
use std::io::Read;
use std::time::Duration;
use url::Url;

use crate::engine::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::text::{SharedTextBuffer, TextBuffer};

/// Read granularity for streaming response bodies into the sink
const CHUNK_SIZE: usize = 8 * 1024;

/// Everything a worker needs to run one transfer, detached from the
/// registry. Cloned at perform/submit time so in-flight transfers are
/// unaffected by later `set_option` calls.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    url: Option<Url>,
    method: Method,
    headers: Vec<(String, String)>,
    body: Option<String>,
    timeout: Duration,
    user_agent: String,
    follow_redirects: bool,
    accept_encoding: bool,
    max_response_size: u64,
}

/// A configured HTTP transfer bound to an output sink.
#[derive(Debug)]
pub struct TransferSession {
    config: TransferConfig,
    sink: SharedTextBuffer,
}

impl TransferSession {
    /// Create a session, optionally pre-configured with a target URL.
    ///
    /// With a URL the session is ready to perform: destination set, output
    /// sink attached, compressed-encoding negotiation on. Without one, a
    /// bare session is returned for manual configuration.
    pub fn new(defaults: &EngineConfig, url: Option<&str>) -> EngineResult<Self> {
        let url = match url {
            Some(u) if !u.is_empty() => {
                Some(Url::parse(u).map_err(|e| EngineError::InvalidUrl(format!("{}: {}", u, e)))?)
            }
            _ => None,
        };
        Ok(Self {
            config: TransferConfig {
                url,
                method: Method::GET,
                headers: Vec::new(),
                body: None,
                timeout: defaults.timeout,
                user_agent: defaults.user_agent.clone(),
                follow_redirects: true,
                accept_encoding: true,
                max_response_size: defaults.max_response_size,
            },
            sink: TextBuffer::shared(""),
        })
    }

    /// Forward one configuration key/value pair to the transfer engine.
    ///
    /// Unknown keys and unparseable values are rejected; nothing is
    /// applied partially.
    pub fn set_option(&mut self, key: &str, value: &str) -> EngineResult<()> {
        let invalid = || EngineError::InvalidOptionValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "url" => {
                self.config.url =
                    Some(Url::parse(value).map_err(|_| invalid())?);
            }
            "method" => {
                self.config.method =
                    Method::from_bytes(value.as_bytes()).map_err(|_| invalid())?;
            }
            "header" => {
                let (name, val) = value.split_once(':').ok_or_else(invalid)?;
                self.config
                    .headers
                    .push((name.trim().to_string(), val.trim().to_string()));
            }
            "body" => {
                self.config.body = Some(value.to_string());
            }
            "timeout_ms" => {
                let ms: u64 = value.parse().map_err(|_| invalid())?;
                self.config.timeout = Duration::from_millis(ms);
            }
            "user_agent" => {
                self.config.user_agent = value.to_string();
            }
            "follow_redirects" => {
                self.config.follow_redirects = value.parse().map_err(|_| invalid())?;
            }
            "accept_encoding" => {
                self.config.accept_encoding = value.parse().map_err(|_| invalid())?;
            }
            "max_response_size" => {
                self.config.max_response_size = value.parse().map_err(|_| invalid())?;
            }
            _ => return Err(EngineError::UnknownOption(key.to_string())),
        }
        Ok(())
    }

    /// Snapshot the configuration and sink for execution outside any
    /// registry lock.
    pub fn snapshot(&self) -> (TransferConfig, SharedTextBuffer) {
        (self.config.clone(), self.sink.clone())
    }

    /// The session's own output sink
    pub fn sink(&self) -> SharedTextBuffer {
        self.sink.clone()
    }
}

/// Execute one transfer, streaming the response body into `sink`.
///
/// HTTP error statuses are not failures: like the underlying engine in
/// its default configuration, the body streams regardless of status.
/// Engine errors (DNS, connect, TLS, timeout) abort the transfer at the
/// point of failure; bytes already appended stay in the sink.
pub(crate) fn execute(config: &TransferConfig, sink: &SharedTextBuffer) -> EngineResult<()> {
    let url = config.url.clone().ok_or(EngineError::MissingUrl)?;

    let redirect = if config.follow_redirects {
        Policy::default()
    } else {
        Policy::none()
    };
    let client = Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .redirect(redirect)
        .gzip(config.accept_encoding)
        .build()?;

    let mut request = client.request(config.method.clone(), url.clone());
    for (name, value) in &config.headers {
        request = request.header(name, value);
    }
    if let Some(body) = &config.body {
        request = request.body(body.clone());
    }

    tracing::debug!(%url, method = %config.method, "starting transfer");
    let mut response = request.send()?;

    let mut chunk = [0u8; CHUNK_SIZE];
    let mut received: u64 = 0;
    loop {
        let n = response.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        received += n as u64;
        if received > config.max_response_size {
            return Err(EngineError::ResponseTooLarge {
                size: received,
                max: config.max_response_size,
            });
        }
        sink.lock().append(&chunk[..n]);
    }
    tracing::debug!(%url, bytes = received, "transfer complete");

    Ok(())
}

/// Runtime version info for the transfer layer, as key/value rows.
///
/// The counterpart of the original add-in's version query: engine name,
/// binding version, and negotiated capabilities.
pub fn version_info() -> Vec<(&'static str, String)> {
    vec![
        ("binding", format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))),
        ("engine", "reqwest (blocking)".to_string()),
        ("encodings", "gzip".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(url: Option<&str>) -> TransferSession {
        TransferSession::new(&EngineConfig::default(), url).unwrap()
    }

    #[test]
    fn test_new_with_url() {
        let s = session(Some("http://localhost:8080/data"));
        let (config, _) = s.snapshot();
        assert_eq!(config.url.unwrap().as_str(), "http://localhost:8080/data");
        assert_eq!(config.method, Method::GET);
        assert!(config.accept_encoding);
    }

    #[test]
    fn test_new_bare_session() {
        let s = session(None);
        let (config, _) = s.snapshot();
        assert!(config.url.is_none());
    }

    #[test]
    fn test_empty_url_yields_bare_session() {
        let s = session(Some(""));
        let (config, _) = s.snapshot();
        assert!(config.url.is_none());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = TransferSession::new(&EngineConfig::default(), Some("not a url")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidUrl(_)));
    }

    #[test]
    fn test_set_option() {
        let mut s = session(None);
        s.set_option("url", "http://localhost:1234/x").unwrap();
        s.set_option("method", "POST").unwrap();
        s.set_option("header", "X-Token: abc").unwrap();
        s.set_option("timeout_ms", "5000").unwrap();
        s.set_option("follow_redirects", "false").unwrap();
        let (config, _) = s.snapshot();
        assert_eq!(config.method, Method::POST);
        assert_eq!(config.headers, vec![("X-Token".to_string(), "abc".to_string())]);
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert!(!config.follow_redirects);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let mut s = session(None);
        let err = s.set_option("proxy", "http://proxy:3128").unwrap_err();
        assert!(matches!(err, EngineError::UnknownOption(_)));
        assert!(err.to_string().contains("proxy"));
    }

    #[test]
    fn test_bad_option_value_rejected() {
        let mut s = session(None);
        assert!(matches!(
            s.set_option("timeout_ms", "soon"),
            Err(EngineError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            s.set_option("header", "no-colon-here"),
            Err(EngineError::InvalidOptionValue { .. })
        ));
    }

    #[test]
    fn test_execute_without_url_fails() {
        let s = session(None);
        let (config, sink) = s.snapshot();
        assert!(matches!(
            execute(&config, &sink),
            Err(EngineError::MissingUrl)
        ));
        assert!(sink.lock().is_empty());
    }

    #[test]
    fn test_version_info_shape() {
        let info = version_info();
        assert!(info.iter().any(|(k, _)| *k == "engine"));
        assert!(info.iter().all(|(_, v)| !v.is_empty()));
    }
}
