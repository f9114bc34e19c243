//! Loader Configuration

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`LoaderConfig::invalid_type_policy`]
pub const INVALID_TYPE_POLICY_ENV: &str = "STRUCTURE_INVALID_TYPES";

/// What to do with a property whose content type is not registered
///
/// Individual properties may override the loader-wide policy with
/// `onInvalid="ignore"` or `onInvalid="exception"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidTypePolicy {
    /// Fail the load with `UnknownType`
    #[default]
    Reject,

    /// Drop the property from the output
    Ignore,
}

impl InvalidTypePolicy {
    /// Parse a policy name (`reject`/`exception` or `ignore`)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" | "exception" => Some(Self::Reject),
            "ignore" => Some(Self::Ignore),
            _ => None,
        }
    }
}

/// Configuration for the structure loader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Policy applied to properties without an `onInvalid` attribute
    pub invalid_type_policy: InvalidTypePolicy,
}

impl LoaderConfig {
    /// Read configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(INVALID_TYPE_POLICY_ENV) {
            match InvalidTypePolicy::parse(&value) {
                Some(policy) => config.invalid_type_policy = policy,
                None => tracing::warn!(
                    "Ignoring unknown {} value '{}', using {:?}",
                    INVALID_TYPE_POLICY_ENV,
                    value,
                    config.invalid_type_policy
                ),
            }
        }

        config
    }

    pub fn with_invalid_type_policy(mut self, policy: InvalidTypePolicy) -> Self {
        self.invalid_type_policy = policy;
        self
    }
}
