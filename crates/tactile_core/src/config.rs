//! Runtime interaction defaults
//!
//! ```toml
//! # seconds
//! min_state_time = 0.035
//! allow_no_selection = true
//! ```

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ConfigError, Result};

/// Defaults applied to widgets that do not override them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct InteractionConfig {
    /// Minimum time a widget must stay hovered before an exit is applied
    /// immediately; earlier exits are debounced by the remainder
    #[serde(
        default = "default_min_state_time",
        deserialize_with = "deserialize_seconds",
        serialize_with = "serialize_seconds"
    )]
    pub min_state_time: Duration,

    /// Whether pressing a group's selected member may leave no member down
    #[serde(default = "default_allow_no_selection")]
    pub allow_no_selection: bool,
}

fn default_min_state_time() -> Duration {
    Duration::from_millis(35)
}

fn default_allow_no_selection() -> bool {
    true
}

fn deserialize_seconds<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(seconds).map_err(|_| {
        serde::de::Error::custom(format!(
            "min_state_time must be a finite, non-negative number of seconds, got {seconds}"
        ))
    })
}

fn serialize_seconds<S>(value: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(value.as_secs_f64())
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_state_time: default_min_state_time(),
            allow_no_selection: default_allow_no_selection(),
        }
    }
}

impl InteractionConfig {
    /// Parse a config from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: InteractionConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Check values that deserialize but make no sense at runtime
    pub fn validate(&self) -> Result<()> {
        // Debounce longer than a minute is almost certainly a unit mistake
        if self.min_state_time > Duration::from_secs(60) {
            return Err(ConfigError::Invalid(format!(
                "min_state_time of {:?} exceeds 60s",
                self.min_state_time
            )));
        }
        Ok(())
    }
}
