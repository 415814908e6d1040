//! Default configuration: four basketball dimensions scored against an
//! average all-star.

use crate::error::ProspectError;
use crate::profile::{AttributeProfile, Dimension, ReferenceProfile, WeightVector};

pub const DEFAULT_PROFILE_NAME: &str = "Rookie Rocket";

/// Upper bound of every attribute scale, used as the chart full mark.
pub const FULL_MARK: f64 = 100.0;

// key, label, prospect, all-star mean, weight
const DEFAULTS: [(&str, &str, f64, f64, f64); 4] = [
    ("shooting", "Shooting", 85.0, 85.0, 0.40),
    ("defense", "Defense", 70.0, 80.0, 0.20),
    ("hustle", "Hustle", 90.0, 85.0, 0.25),
    ("teamFit", "Team Fit", 75.0, 75.0, 0.15),
];

pub fn all_star_reference() -> Result<ReferenceProfile, ProspectError> {
    let entries = DEFAULTS
        .iter()
        .map(|(key, label, _, mean, _)| (Dimension::new(*key, *label), *mean))
        .collect();
    ReferenceProfile::new(entries)
}

pub fn rookie_profile() -> AttributeProfile {
    AttributeProfile::new(DEFAULTS.iter().map(|(key, _, value, ..)| (*key, *value)))
}

pub fn default_weights() -> WeightVector {
    WeightVector::new(DEFAULTS.iter().map(|(key, .., weight)| (*key, *weight)))
}
