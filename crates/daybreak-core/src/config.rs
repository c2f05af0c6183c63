use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Redirect target used when the config does not supply one.
pub const DEFAULT_REDIRECT_URL: &str = "http://weixin.qq.com/download";

/// A single failed validation check.
#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<FieldError>,
    pub warnings: Vec<FieldError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// An anniversary or birthday entry.
///
/// `date` is either a strict `YYYY-MM-DD` solar date or a lunar-tagged
/// spec (`rYYYY-M-D`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateEntry {
    pub name: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Messaging-provider app identifier
    pub app_id: String,

    /// Messaging-provider app secret
    pub app_secret: String,

    /// Weather/geocoding API key
    pub weather_key: String,

    /// Provider template to render the message with
    pub template_id: String,

    /// Region the weather fields describe
    pub region: String,

    /// Recipient identifiers
    pub user: Vec<String>,

    /// Anniversaries rendered as elapsed-day counters
    #[serde(default)]
    pub anniversaries: Vec<DateEntry>,

    /// Birthdays rendered as countdowns to the next occurrence
    #[serde(default)]
    pub birthdays: Vec<DateEntry>,

    /// Where tapping the message sends the recipient
    #[serde(default)]
    pub redirect_url: Option<String>,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration and validate it.
    ///
    /// Returns an error if validation fails; warnings are logged and kept.
    pub fn load_validated(path: &Path) -> Result<Self> {
        let config = Self::load(path)?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("config warning: {warning}");
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        let required = [
            ("app_id", &self.app_id),
            ("app_secret", &self.app_secret),
            ("weather_key", &self.weather_key),
            ("template_id", &self.template_id),
            ("region", &self.region),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                result.add_error(field, "must not be empty");
            }
        }

        if self.user.is_empty() {
            result.add_error("user", "at least one recipient is required");
        } else if self.user.iter().any(|u| u.trim().is_empty()) {
            result.add_error("user", "recipient identifiers must not be empty");
        }

        if let Some(url) = &self.redirect_url {
            self.validate_url(url, "redirect_url", &mut result);
        }

        if self.anniversaries.is_empty() && self.birthdays.is_empty() {
            result.add_warning(
                "anniversaries",
                "no anniversaries or birthdays configured; the message will only carry date and weather",
            );
        }

        result
    }

    /// The configured redirect target, or the provider default.
    pub fn redirect_url_or_default(&self) -> &str {
        self.redirect_url.as_deref().unwrap_or(DEFAULT_REDIRECT_URL)
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("invalid URL: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> Config {
        Config {
            app_id: "wx0000".into(),
            app_secret: "secret".into(),
            weather_key: "key".into(),
            template_id: "tmpl".into(),
            region: "Shanghai".into(),
            user: vec!["user1".into()],
            anniversaries: Vec::new(),
            birthdays: Vec::new(),
            redirect_url: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        let result = sample().validate();
        assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn empty_recipient_list_is_an_error() {
        let mut config = sample();
        config.user.clear();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "user"));
    }

    #[test]
    fn bad_redirect_scheme_is_an_error() {
        let mut config = sample();
        config.redirect_url = Some("ftp://example.com".into());
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn redirect_url_defaults_to_provider_download_page() {
        let config = sample();
        assert_eq!(config.redirect_url_or_default(), DEFAULT_REDIRECT_URL);
    }

    #[test]
    fn no_dates_configured_is_only_a_warning() {
        let result = sample().validate();
        assert!(result.is_valid());
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn load_rejects_missing_required_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // no app_secret
        write!(
            file,
            r#"{{"app_id": "wx", "weather_key": "k", "template_id": "t", "region": "r", "user": ["u"]}}"#
        )
        .unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn load_reads_optional_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "app_id": "wx", "app_secret": "s", "weather_key": "k",
                "template_id": "t", "region": "r", "user": ["u1", "u2"],
                "anniversaries": [{{"name": "met", "date": "2020-01-01"}}],
                "birthdays": [{{"name": "Li", "date": "r1996-8-8"}}],
                "redirect_url": "https://example.com/daily"
            }}"#
        )
        .unwrap();

        let config = Config::load_validated(file.path()).unwrap();
        assert_eq!(config.user.len(), 2);
        assert_eq!(config.anniversaries[0].name, "met");
        assert_eq!(config.birthdays[0].date, "r1996-8-8");
        assert_eq!(config.redirect_url_or_default(), "https://example.com/daily");
    }
}
