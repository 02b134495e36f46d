use serde::{Deserialize, Serialize};

use crate::error::{KeyListerError, Result};

/// Settings for one inventory run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListerConfig {
    /// Concurrent access key listings.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// `RoleSessionName` passed to STS `AssumeRole`.
    #[serde(default = "default_session_name")]
    pub session_name: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Shared-config profile for the base credentials; `None` uses the
    /// default provider chain.
    #[serde(default)]
    pub profile: Option<String>,
}

fn default_workers() -> usize {
    10
}

fn default_session_name() -> String {
    "aws-access-key-lister".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for ListerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            session_name: default_session_name(),
            region: default_region(),
            profile: None,
        }
    }
}

impl ListerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(KeyListerError::Config(
                "workers must be a positive integer".into(),
            ));
        }
        // STS limits role session names to 2-64 characters.
        let len = self.session_name.chars().count();
        if !(2..=64).contains(&len) {
            return Err(KeyListerError::Config(format!(
                "session name must be 2-64 characters, got {len}"
            )));
        }
        if self.region.trim().is_empty() {
            return Err(KeyListerError::Config("region must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_cli() {
        let config = ListerConfig::default();
        assert_eq!(config.workers, 10);
        assert_eq!(config.session_name, "aws-access-key-lister");
        assert_eq!(config.region, "us-east-1");
        assert!(config.profile.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: ListerConfig = serde_json::from_str(r#"{"workers": 4}"#).unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.region, "us-east-1");
    }

    #[test]
    fn zero_workers_is_invalid() {
        let config = ListerConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(KeyListerError::Config(_))));
    }

    #[test]
    fn overlong_session_name_is_invalid() {
        let config = ListerConfig {
            session_name: "x".repeat(65),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("65"));
    }
}
