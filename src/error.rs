use thiserror::Error;

/// Errors that can occur while searching, scraping or recording recipes
#[derive(Error, Debug)]
pub enum DishError {
    /// Failed to fetch a page (network error or timeout)
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    /// A URL could not be parsed or resolved
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The caller supplied unusable input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Reading or writing the history document failed
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The history document could not be (de)serialized
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl DishError {
    /// True when the error was caused by caller input rather than an internal fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DishError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_client_error() {
        let err = DishError::Validation("No ingredients provided".to_string());
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Invalid input: No ingredients provided");
    }

    #[test]
    fn test_storage_errors_are_internal() {
        let err = DishError::from(std::io::Error::other("disk full"));
        assert!(!err.is_client_error());

        let err = DishError::HttpStatus {
            url: "https://example.com".to_string(),
            status: 503,
        };
        assert!(!err.is_client_error());
    }
}
