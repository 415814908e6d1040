use serde::Serialize;
use tracing::warn;

use crate::error::ProspectError;
use crate::likelihood::{is_usable_sigma, DEFAULT_SIGMA};

pub const ATTRIBUTE_MIN: f64 = 0.0;
pub const ATTRIBUTE_MAX: f64 = 100.0;

/// What the store does with an attribute value outside
/// `[ATTRIBUTE_MIN, ATTRIBUTE_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeRangePolicy {
    /// Feed the value into the kernel as given.
    #[default]
    Passthrough,
    Clamp,
    Reject,
}

impl AttributeRangePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "passthrough" | "pass-through" | "none" => Some(Self::Passthrough),
            "clamp" => Some(Self::Clamp),
            "reject" | "strict" => Some(Self::Reject),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::Clamp => "clamp",
            Self::Reject => "reject",
        }
    }

    pub fn apply(self, dimension: &str, value: f64) -> Result<f64, ProspectError> {
        if !value.is_finite() {
            return Err(ProspectError::NonFiniteValue {
                dimension: dimension.to_string(),
                value,
            });
        }
        let in_range = (ATTRIBUTE_MIN..=ATTRIBUTE_MAX).contains(&value);
        match self {
            Self::Passthrough => Ok(value),
            Self::Clamp => Ok(value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX)),
            Self::Reject if in_range => Ok(value),
            Self::Reject => Err(ProspectError::OutOfRange {
                dimension: dimension.to_string(),
                value,
                min: ATTRIBUTE_MIN,
                max: ATTRIBUTE_MAX,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    pub sigma: f64,
    pub range_policy: AttributeRangePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            range_policy: AttributeRangePolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Reads `PROSPECT_SIGMA` and `PROSPECT_ATTRIBUTE_RANGE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let sigma = match lookup("PROSPECT_SIGMA")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if is_usable_sigma(v) => v,
                _ => {
                    warn!(value = %raw, default = DEFAULT_SIGMA, "invalid PROSPECT_SIGMA, using default");
                    DEFAULT_SIGMA
                }
            },
            None => DEFAULT_SIGMA,
        };

        let range_policy = match lookup("PROSPECT_ATTRIBUTE_RANGE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            Some(raw) => AttributeRangePolicy::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "unknown PROSPECT_ATTRIBUTE_RANGE, using passthrough");
                AttributeRangePolicy::Passthrough
            }),
            None => AttributeRangePolicy::Passthrough,
        };

        Self {
            sigma,
            range_policy,
        }
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        if is_usable_sigma(sigma) {
            self.sigma = sigma;
        } else {
            warn!(sigma, default = DEFAULT_SIGMA, "sigma must be positive, using default");
            self.sigma = DEFAULT_SIGMA;
        }
        self
    }

    pub fn with_range_policy(mut self, policy: AttributeRangePolicy) -> Self {
        self.range_policy = policy;
        self
    }
}
