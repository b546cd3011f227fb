use thiserror::Error;

/// Error types for LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Missing or malformed credentials
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Invalid request parameters, detected before anything is sent
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Provider answered with a non-2xx status; `message` is the response body
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Network or connection error, including timeouts
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// JSON parsing or serialization error, including unrecognized response shapes
    #[error("Parse error: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

impl LlmError {
    /// Create an authentication error
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an API error
    pub fn api_error(status: u16, message: String) -> Self {
        Self::Api { status, message }
    }

    /// HTTP status reported by the provider, if the failure came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network { source } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_provider_failures() {
        assert_eq!(
            LlmError::api_error(429, "Too many requests".to_string()).status(),
            Some(429)
        );
        assert_eq!(LlmError::authentication("no key").status(), None);
        assert_eq!(LlmError::invalid_request("no messages").status(), None);
    }
}
