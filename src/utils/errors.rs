use thiserror::Error;

/// Failures of a single completion round trip
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// Network unreachable, DNS, TLS or timeout
    #[error("{0}")]
    Transport(String),

    /// Non-2xx response. `message` is the server's `error.message` when it sent one
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 2xx response without a usable `choices` entry
    #[error("No response from API")]
    EmptyResponse,

    /// Body could not be decoded as the expected JSON
    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// Build an API error from a status code and an optional server message
    pub fn api(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        Self::Api { status, message }
    }

    /// HTTP status if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_prefers_server_message() {
        let err = ChatError::api(401, Some("bad key".to_string()));
        assert_eq!(err.to_string(), "bad key");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_api_error_falls_back_to_status() {
        assert_eq!(
            ChatError::api(503, None).to_string(),
            "HTTP error! status: 503"
        );
        assert_eq!(
            ChatError::api(500, Some("  ".to_string())).to_string(),
            "HTTP error! status: 500"
        );
    }

    #[test]
    fn test_empty_response_message() {
        assert_eq!(ChatError::EmptyResponse.to_string(), "No response from API");
        assert_eq!(ChatError::EmptyResponse.status(), None);
    }
}
