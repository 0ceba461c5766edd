use thiserror::Error;

/// Error type for the dashboard core library.
///
/// The first four variants are fetch failures: the page shows them as a
/// warning in the affected panel and carries on.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A provider answered, but not with something usable (non-2xx status,
    /// missing keys, invalid values).
    #[error("API error ({provider}): {message}")]
    Api { provider: String, message: String },

    /// Connection failure or timeout.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("No provider available for {0}")]
    NoProvider(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// A chart could not be drawn.
    #[error("Render error: {0}")]
    Render(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    /// Whether this error came from talking to a remote data source.
    /// Only these are retried.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::Network(_) | Self::Deserialization(_) | Self::NoProvider(_)
        )
    }

    pub(crate) fn api(provider: &str, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.to_owned(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        let mut text = e.to_string();
        // Query strings may hold API keys on some providers.
        if let Some(query) = e.url().and_then(|url| url.query()) {
            text = text.replace(query, "<query redacted>");
        }
        if e.is_timeout() {
            return Self::Network(format!("request timed out: {text}"));
        }
        Self::Network(text)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Deserialization(e.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        Self::FileIO(e.to_string())
    }
}
