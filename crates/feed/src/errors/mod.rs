//! Error types and retry classification for the feed crate.
//!
//! This module provides:
//! - [`FetchError`]: The main error enum for all provider fetch operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching time series from a provider.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which determines whether the
/// per-symbol pipeline retries the fetch before marking the symbol failed.
///
/// Note that "symbol not found" and "no data in range" are NOT errors: the
/// provider contract maps both to a successful empty result, so that newly
/// listed tickers and non-trading days do not count against the retry budget.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The provider rate limited the request (HTTP 429).
    /// Should retry with exponential backoff.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    /// Should retry with exponential backoff.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A transient provider-side failure (5xx-class).
    /// Should retry with exponential backoff.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider rejected our credentials or identity.
    /// This is a terminal error - retrying won't help.
    #[error("Authentication rejected: {provider}")]
    AuthFailed {
        /// The provider that rejected the request
        provider: String,
    },

    /// The provider returned a response we could not parse.
    /// This is a terminal error - retrying returns the same bytes.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// The provider that returned the response
        provider: String,
        /// Description of the parse failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl FetchError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::Never`]: Don't retry, the error is terminal
    /// - [`RetryClass::WithBackoff`]: Retry with exponential backoff up to
    ///   the bounded attempt count
    ///
    /// # Examples
    ///
    /// ```
    /// use tickerbeat_feed::errors::{FetchError, RetryClass};
    ///
    /// let error = FetchError::RateLimited { provider: "YAHOO".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = FetchError::AuthFailed { provider: "YAHOO".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Transient errors - retry with backoff
            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::ProviderError { .. }
            | Self::Network(_) => RetryClass::WithBackoff,

            // Terminal errors - never retry
            Self::AuthFailed { .. } | Self::MalformedResponse { .. } => RetryClass::Never,
        }
    }

    /// Convenience predicate over [`retry_class`](Self::retry_class).
    pub fn is_retryable(&self) -> bool {
        self.retry_class() == RetryClass::WithBackoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_retries_with_backoff() {
        let error = FetchError::RateLimited {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
        assert!(error.is_retryable());
    }

    #[test]
    fn test_timeout_retries_with_backoff() {
        let error = FetchError::Timeout {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_provider_error_retries_with_backoff() {
        let error = FetchError::ProviderError {
            provider: "YAHOO".to_string(),
            message: "Internal server error".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_auth_failed_never_retries() {
        let error = FetchError::AuthFailed {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_malformed_response_never_retries() {
        let error = FetchError::MalformedResponse {
            provider: "YAHOO".to_string(),
            message: "unexpected token".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_error_display() {
        let error = FetchError::RateLimited {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: YAHOO");

        let error = FetchError::ProviderError {
            provider: "YAHOO".to_string(),
            message: "service unavailable".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Provider error: YAHOO - service unavailable"
        );
    }
}
