use crate::utils::error::{AllocatorError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> AllocatorError {
    AllocatorError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

/// Roster files are read as CSV, so the name must carry a `.csv` extension.
pub fn validate_csv_file(field: &str, file: &str) -> Result<()> {
    validate_not_blank(field, file)?;
    match Path::new(file).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(()),
        Some(ext) => Err(invalid(field, file, format!("Expected a .csv file, got .{}", ext))),
        None => Err(invalid(field, file, "File name has no extension")),
    }
}

/// The geocoder is reached over plain HTTP(S).
pub fn validate_endpoint(field: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field, endpoint, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(field, endpoint, format!("Unsupported URL scheme: {}", scheme))),
    }
}

/// Returns the key once it is present, non-blank and not a leftover `${VAR}` placeholder.
pub fn validate_api_key<'a>(field: &str, api_key: &'a Option<String>) -> Result<&'a str> {
    let key = api_key
        .as_deref()
        .ok_or_else(|| AllocatorError::MissingConfigError {
            field: field.to_string(),
        })?;
    if key.starts_with("${") {
        return Err(AllocatorError::ConfigValidationError {
            field: field.to_string(),
            message: format!("environment variable {} is not set", key),
        });
    }
    validate_not_blank(field, key)?;
    Ok(key)
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(field, value, format!("Value must be between {} and {}", min, max)));
    }
    Ok(())
}

pub fn validate_non_empty_list(field: &str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(AllocatorError::MissingConfigError {
            field: field.to_string(),
        });
    }
    Ok(())
}
