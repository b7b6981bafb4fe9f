//! Error classification by message text

/// Substrings that mark an error as permanent. Checked first.
const FATAL_MARKERS: &[&str] = &[
    "invalid api key",
    "authentication",
    "unauthorized",
    "forbidden",
    "not found",
    "400",
    "401",
    "403",
    "404",
];

/// Substrings that mark an error as transient
const RETRYABLE_MARKERS: &[&str] = &[
    "rate limit",
    "timeout",
    "temporary",
    "service unavailable",
    "internal server error",
    "connection error",
    "network error",
    "502",
    "503",
    "504",
];

/// Whether a failed call is worth another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClassification {
    Retryable,
    Fatal,
}

impl ErrorClassification {
    /// Classify an error from its text.
    ///
    /// Fatal markers win over retryable ones; text matching neither is
    /// treated as retryable.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if FATAL_MARKERS.iter().any(|m| lower.contains(m)) {
            return ErrorClassification::Fatal;
        }
        if RETRYABLE_MARKERS.iter().any(|m| lower.contains(m)) {
            return ErrorClassification::Retryable;
        }
        ErrorClassification::Retryable
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorClassification::Retryable)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorClassification::Fatal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClassification::Retryable => "retryable",
            ErrorClassification::Fatal => "fatal",
        }
    }
}

impl std::fmt::Display for ErrorClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_markers() {
        for message in [
            "Invalid API key provided",
            "Authentication failed",
            "401 Unauthorized",
            "HTTP 403 Forbidden",
            "model not found",
            "HTTP 400: bad request body",
        ] {
            assert_eq!(ErrorClassification::classify(message), ErrorClassification::Fatal, "{message}");
        }
    }

    #[test]
    fn test_retryable_markers() {
        for message in [
            "Rate limit exceeded",
            "request timeout",
            "HTTP 503 Service Unavailable",
            "HTTP 502 bad gateway",
            "Internal Server Error",
            "connection error: reset by peer",
        ] {
            assert_eq!(ErrorClassification::classify(message), ErrorClassification::Retryable, "{message}");
        }
    }

    #[test]
    fn test_fatal_wins_over_retryable() {
        let classification = ErrorClassification::classify("rate limit reached: 401 unauthorized");
        assert!(classification.is_fatal());
        let classification = ErrorClassification::classify("timeout while fetching: 404 not found");
        assert!(classification.is_fatal());
    }

    #[test]
    fn test_unknown_errors_are_retryable() {
        assert!(ErrorClassification::classify("something odd happened").is_retryable());
        assert!(ErrorClassification::classify("").is_retryable());
    }
}
