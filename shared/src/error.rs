use thiserror::Error;

/// Failure of a directions request, classified by where it went wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("directions service unreachable: {0}")]
    Network(String),
    #[error("{}", rejected_message("directions service", .status, .message))]
    Rejected { status: u16, message: Option<String> },
    #[error("unexpected directions response: {0}")]
    Malformed(String),
}

impl RouteError {
    /// Network failures are transient; the user may simply retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RouteError::Network(_))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RadarError {
    #[error("radar feed unreachable: {0}")]
    Network(String),
    #[error("{}", rejected_message("radar feed", .status, .message))]
    Rejected { status: u16, message: Option<String> },
    #[error("unexpected radar metadata: {0}")]
    Malformed(String),
    #[error("radar feed lists no imagery frames")]
    NoFrames,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoundsError {
    #[error("no coordinates to fit")]
    Empty,
    #[error("coordinate is not a finite number")]
    NonFinite,
}

fn rejected_message(service: &str, status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("{service} rejected the request (HTTP {status}): {message}"),
        None => format!("{service} rejected the request (HTTP {status})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_includes_status_and_server_message() {
        let err = RouteError::Rejected {
            status: 404,
            message: Some("Could not find routable point".into()),
        };
        assert_eq!(
            err.to_string(),
            "directions service rejected the request (HTTP 404): Could not find routable point"
        );
    }

    #[test]
    fn rejected_without_message_still_names_status() {
        let err = RadarError::Rejected {
            status: 503,
            message: None,
        };
        assert_eq!(err.to_string(), "radar feed rejected the request (HTTP 503)");
    }

    #[test]
    fn only_network_failures_are_retryable() {
        assert!(RouteError::Network("refused".into()).is_retryable());
        assert!(!RouteError::Malformed("no features".into()).is_retryable());
    }
}
