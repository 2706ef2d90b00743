use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllocatorError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },

    #[error("Geocoding failed for '{place}': {message}")]
    GeocodingError { place: String, message: String },

    #[error("Manager '{manager_id}' references unknown office '{office_id}'")]
    UnknownOffice {
        manager_id: String,
        office_id: String,
    },

    #[error("Office '{office_id}' is listed more than once")]
    DuplicateOffice { office_id: String },

    #[error("No manager available in {pool} pool for client '{client_id}'")]
    EmptyPool { pool: String, client_id: String },

    #[error("No office has a usable location for client '{client_id}'")]
    NoLocatableOffice { client_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Network,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AllocatorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AllocatorError::IoError(_) => ErrorCategory::Io,
            AllocatorError::HttpError(_) | AllocatorError::GeocodingError { .. } => {
                ErrorCategory::Network
            }
            AllocatorError::CsvError(_) | AllocatorError::SerializationError(_) => {
                ErrorCategory::Data
            }
            AllocatorError::ConfigError { .. }
            | AllocatorError::ConfigValidationError { .. }
            | AllocatorError::InvalidConfigValueError { .. }
            | AllocatorError::MissingConfigError { .. }
            | AllocatorError::UnknownOffice { .. }
            | AllocatorError::DuplicateOffice { .. }
            | AllocatorError::EmptyPool { .. }
            | AllocatorError::NoLocatableOffice { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AllocatorError::GeocodingError { .. } => ErrorSeverity::Low,
            AllocatorError::HttpError(_) => ErrorSeverity::Medium,
            AllocatorError::CsvError(_)
            | AllocatorError::SerializationError(_)
            | AllocatorError::UnknownOffice { .. }
            | AllocatorError::DuplicateOffice { .. }
            | AllocatorError::EmptyPool { .. }
            | AllocatorError::NoLocatableOffice { .. } => ErrorSeverity::High,
            AllocatorError::IoError(_)
            | AllocatorError::ConfigError { .. }
            | AllocatorError::ConfigValidationError { .. }
            | AllocatorError::InvalidConfigValueError { .. }
            | AllocatorError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AllocatorError::IoError(_) => {
                "Check that the input files exist and the output directory is writable".to_string()
            }
            AllocatorError::HttpError(_) | AllocatorError::GeocodingError { .. } => {
                "Check network access, the geocoder endpoint and the API key".to_string()
            }
            AllocatorError::CsvError(_) => {
                "Check that the CSV files are comma separated and start with a header row"
                    .to_string()
            }
            AllocatorError::SerializationError(_) => {
                "Check that the allocation output can be written as JSON".to_string()
            }
            AllocatorError::ConfigError { .. }
            | AllocatorError::ConfigValidationError { .. }
            | AllocatorError::InvalidConfigValueError { .. }
            | AllocatorError::MissingConfigError { .. } => {
                "Review the TOML configuration file and referenced environment variables"
                    .to_string()
            }
            AllocatorError::UnknownOffice { office_id, .. } => format!(
                "Add office '{}' to the offices file or fix the manager's office column",
                office_id
            ),
            AllocatorError::DuplicateOffice { office_id } => format!(
                "Keep a single row for office '{}' in the offices file (ids ignore case)",
                office_id
            ),
            AllocatorError::EmptyPool { pool, .. } => {
                format!("Make sure at least one manager belongs to the {} pool", pool)
            }
            AllocatorError::NoLocatableOffice { .. } => {
                "Give at least one office valid latitude and longitude values".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Network => format!("Geocoding service problem: {}", self),
            ErrorCategory::Data => format!("Input data could not be processed: {}", self),
            ErrorCategory::Configuration => format!("Invalid setup: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AllocatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_roster_errors_are_configuration_errors() {
        let err = AllocatorError::UnknownOffice {
            manager_id: "m-1".to_string(),
            office_id: "Офис 9".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("m-1"));
        assert!(err.recovery_suggestion().contains("Офис 9"));
    }

    #[test]
    fn test_geocoding_errors_are_low_severity() {
        let err = AllocatorError::GeocodingError {
            place: "Алматы".to_string(),
            message: "403 Forbidden".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().starts_with("Geocoding service problem"));
    }
}
