use crate::adapters::geocoder::DEFAULT_ENDPOINT;
use crate::core::locator::{DEFAULT_CONCURRENT_REQUESTS, DEFAULT_LANGUAGE};
use crate::domain::rules::AssignmentRules;
use crate::utils::error::{AllocatorError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocatorConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub rules: AssignmentRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_directory")]
    pub directory: String,
    #[serde(default = "default_clients")]
    pub clients: String,
    #[serde(default = "default_managers")]
    pub managers: String,
    #[serde(default = "default_offices")]
    pub offices: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_clients() -> String {
    "clients.csv".to_string()
}

fn default_managers() -> String {
    "managers.csv".to_string()
}

fn default_offices() -> String {
    "offices.csv".to_string()
}

fn default_output_path() -> String {
    "result.json".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_concurrent_requests() -> usize {
    DEFAULT_CONCURRENT_REQUESTS
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            clients: default_clients(),
            managers: default_managers(),
            offices: default_offices(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            pretty: false,
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            language: default_language(),
            timeout_seconds: default_timeout_seconds(),
            concurrent_requests: default_concurrent_requests(),
        }
    }
}

impl AllocatorConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AllocatorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable, leaving unknown ones untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AllocatorError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Checks everything a full run needs.
    pub fn validate_config(&self) -> Result<()> {
        self.validate_rosters()?;
        self.validate_geocoder()
    }

    /// Checks the input, output and rules sections; enough for a dry run.
    pub fn validate_rosters(&self) -> Result<()> {
        validation::validate_not_blank("input.directory", &self.input.directory)?;
        validation::validate_csv_file("input.clients", &self.input.clients)?;
        validation::validate_csv_file("input.managers", &self.input.managers)?;
        validation::validate_csv_file("input.offices", &self.input.offices)?;
        validation::validate_not_blank("output.path", &self.output.path)?;

        validation::validate_non_empty_list("rules.home_countries", &self.rules.home_countries)?;
        validation::validate_non_empty_list(
            "rules.foreign_office_ids",
            &self.rules.foreign_office_ids,
        )
    }

    pub fn validate_geocoder(&self) -> Result<()> {
        let geocoder = &self.geocoder;
        validation::validate_endpoint("geocoder.endpoint", &geocoder.endpoint)?;
        validation::validate_api_key("geocoder.api_key", &geocoder.api_key)?;
        validation::validate_not_blank("geocoder.language", &geocoder.language)?;
        validation::validate_range("geocoder.timeout_seconds", geocoder.timeout_seconds, 1, 300)?;
        validation::validate_range(
            "geocoder.concurrent_requests",
            geocoder.concurrent_requests,
            1,
            256,
        )
    }
}

impl Validate for AllocatorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
