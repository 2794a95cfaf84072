//! Client error types.

use thiserror::Error;

/// Errors that can occur when talking to the CSPM API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("API request failed with status {status}{}", message_suffix(.message.as_deref()))]
    ApiStatus {
        /// HTTP status code.
        status: u16,
        /// The `message` field of the JSON error body, when there is one.
        message: Option<String>,
    },

    /// The response body is not the JSON shape we expect.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A resource endpoint could not be turned into a URL.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The token cannot be used as an HTTP header value.
    #[error("invalid API token: {0}")]
    InvalidToken(String),

    /// A fetch task died before reporting its page.
    #[error("fetch task failed: {0}")]
    Task(String),

    /// A page of a multi-page run failed; the whole run is discarded.
    #[error("page {page} of {context}: {source}")]
    Page {
        page: u32,
        context: String,
        #[source]
        source: Box<ClientError>,
    },
}

fn message_suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl ClientError {
    /// Attach the page number and run description to an error.
    #[must_use]
    pub fn at_page(self, page: u32, context: &str) -> Self {
        Self::Page {
            page,
            context: context.to_string(),
            source: Box::new(self),
        }
    }

    /// The HTTP status behind this error, looking through page context.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiStatus { status, .. } => Some(*status),
            Self::Page { source, .. } => source.status(),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Page number of the failing page, if this came out of a multi-page run.
    #[must_use]
    pub const fn page(&self) -> Option<u32> {
        match self {
            Self::Page { page, .. } => Some(*page),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_display_with_and_without_message() {
        let with = ClientError::ApiStatus {
            status: 400,
            message: Some("invalid filter".into()),
        };
        assert_eq!(
            with.to_string(),
            "API request failed with status 400: invalid filter"
        );

        let without = ClientError::ApiStatus {
            status: 502,
            message: None,
        };
        assert_eq!(without.to_string(), "API request failed with status 502");
    }

    #[test]
    fn page_context_keeps_status() {
        let err = ClientError::ApiStatus {
            status: 429,
            message: None,
        }
        .at_page(4, "requirements");
        assert_eq!(err.page(), Some(4));
        assert_eq!(err.status(), Some(429));
        assert!(err.to_string().starts_with("page 4 of requirements:"));
    }
}
