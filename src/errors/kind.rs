//! Closed error taxonomy

use crate::core::LogLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category every failed call is mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// No response: connection failure or timeout
    Network,
    Server,
    Validation,
    Authentication,
    Authorization,
    NotFound,
    Conflict,
    RateLimit,
    Unknown,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::Network,
        ErrorKind::Server,
        ErrorKind::Validation,
        ErrorKind::Authentication,
        ErrorKind::Authorization,
        ErrorKind::NotFound,
        ErrorKind::Conflict,
        ErrorKind::RateLimit,
        ErrorKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK",
            ErrorKind::Server => "SERVER",
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Authentication => "AUTHENTICATION",
            ErrorKind::Authorization => "AUTHORIZATION",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::RateLimit => "RATE_LIMIT",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }

    /// Statuses that always map to one kind, whatever the body says
    pub fn exact_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(ErrorKind::Authentication),
            403 => Some(ErrorKind::Authorization),
            404 => Some(ErrorKind::NotFound),
            409 => Some(ErrorKind::Conflict),
            422 => Some(ErrorKind::Validation),
            429 => Some(ErrorKind::RateLimit),
            _ => None,
        }
    }

    /// Kind of a response that carries a structured error body
    ///
    /// Exact statuses first, then any 5xx is SERVER and any other 4xx is
    /// VALIDATION. Statuses below 400 have no status-derived kind.
    pub fn from_status(status: u16) -> Option<Self> {
        Self::exact_status(status).or(match status {
            500.. => Some(ErrorKind::Server),
            400..=499 => Some(ErrorKind::Validation),
            _ => None,
        })
    }

    /// Kind of a response without a usable body: exact statuses and 5xx only
    pub fn fixed_for_status(status: u16) -> Option<Self> {
        Self::exact_status(status).or((status >= 500).then_some(ErrorKind::Server))
    }

    /// Substring match on a server error token, first match wins
    pub fn from_code_token(token: &str) -> Option<Self> {
        let has = |needle: &str| token.contains(needle);

        if has("AUTH") || has("TOKEN") {
            Some(ErrorKind::Authentication)
        } else if has("PERMISSION") {
            Some(ErrorKind::Authorization)
        } else if has("NOT_FOUND") {
            Some(ErrorKind::NotFound)
        } else if has("CONFLICT") || has("DUPLICATE") {
            Some(ErrorKind::Conflict)
        } else if has("VALIDATION") || has("INVALID") {
            Some(ErrorKind::Validation)
        } else if has("RATE_LIMIT") {
            Some(ErrorKind::RateLimit)
        } else if has("SERVER") || has("DATABASE") {
            Some(ErrorKind::Server)
        } else if has("NETWORK") {
            Some(ErrorKind::Network)
        } else {
            None
        }
    }

    /// Level a classification of this kind is logged at
    pub fn log_level(&self) -> LogLevel {
        match self {
            ErrorKind::Server | ErrorKind::Unknown => LogLevel::Error,
            _ => LogLevel::Warning,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == upper)
            .ok_or_else(|| format!("Unknown error kind: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_statuses() {
        assert_eq!(ErrorKind::from_status(401), Some(ErrorKind::Authentication));
        assert_eq!(ErrorKind::from_status(403), Some(ErrorKind::Authorization));
        assert_eq!(ErrorKind::from_status(404), Some(ErrorKind::NotFound));
        assert_eq!(ErrorKind::from_status(409), Some(ErrorKind::Conflict));
        assert_eq!(ErrorKind::from_status(422), Some(ErrorKind::Validation));
        assert_eq!(ErrorKind::from_status(429), Some(ErrorKind::RateLimit));
    }

    #[test]
    fn test_status_ranges() {
        assert_eq!(ErrorKind::from_status(400), Some(ErrorKind::Validation));
        assert_eq!(ErrorKind::from_status(418), Some(ErrorKind::Validation));
        assert_eq!(ErrorKind::from_status(503), Some(ErrorKind::Server));
        assert_eq!(ErrorKind::from_status(302), None);

        assert_eq!(ErrorKind::fixed_for_status(400), None);
        assert_eq!(ErrorKind::fixed_for_status(502), Some(ErrorKind::Server));
    }

    #[test]
    fn test_token_priority() {
        // AUTH is checked before NOT_FOUND
        assert_eq!(
            ErrorKind::from_code_token("AUTH_USER_NOT_FOUND"),
            Some(ErrorKind::Authentication)
        );
        assert_eq!(
            ErrorKind::from_code_token("INVALID_TOKEN"),
            Some(ErrorKind::Authentication)
        );
        assert_eq!(
            ErrorKind::from_code_token("DUPLICATE_USER"),
            Some(ErrorKind::Conflict)
        );
        assert_eq!(
            ErrorKind::from_code_token("INVALID_FILE_TYPE"),
            Some(ErrorKind::Validation)
        );
        assert_eq!(
            ErrorKind::from_code_token("DATABASE_ERROR"),
            Some(ErrorKind::Server)
        );
        assert_eq!(
            ErrorKind::from_code_token("NETWORK_ERROR"),
            Some(ErrorKind::Network)
        );
        assert_eq!(ErrorKind::from_code_token("file_processing_failed"), None);
    }

    #[test]
    fn test_log_level() {
        assert_eq!(ErrorKind::Server.log_level(), LogLevel::Error);
        assert_eq!(ErrorKind::Unknown.log_level(), LogLevel::Error);
        assert_eq!(ErrorKind::Network.log_level(), LogLevel::Warning);
    }

    #[test]
    fn test_serde_and_parse() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::RateLimit).unwrap(),
            "\"RATE_LIMIT\""
        );
        assert_eq!("not_found".parse::<ErrorKind>(), Ok(ErrorKind::NotFound));
        assert!("teapot".parse::<ErrorKind>().is_err());
    }
}
