use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ProspectError;
use crate::likelihood::{effective_sigma, is_usable_sigma, likelihood, DEFAULT_SIGMA};
use crate::profile::{AttributeProfile, ReferenceProfile, WeightVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    DevelopmentProject,
    Solid,
    StrongPotential,
    Elite,
}

impl Tier {
    /// Highest tier first, the order thresholds are checked in.
    pub const DESCENDING: [Self; 4] = [
        Self::Elite,
        Self::StrongPotential,
        Self::Solid,
        Self::DevelopmentProject,
    ];

    /// Inclusive lower bound of the tier's percentage band.
    pub const fn min_percentage(self) -> u8 {
        match self {
            Self::Elite => 80,
            Self::StrongPotential => 60,
            Self::Solid => 40,
            Self::DevelopmentProject => 0,
        }
    }

    /// Step function over the integer percentage; a boundary value belongs to
    /// the higher tier.
    pub fn from_percentage(percentage: u8) -> Self {
        Self::DESCENDING
            .into_iter()
            .find(|tier| percentage >= tier.min_percentage())
            .unwrap_or(Self::DevelopmentProject)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Elite => "Elite",
            Self::StrongPotential => "Strong potential",
            Self::Solid => "Solid",
            Self::DevelopmentProject => "Development project",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One dimension's share of the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionScore {
    pub key: String,
    pub value: f64,
    pub mean: f64,
    pub likelihood: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Weighted likelihood clamped to `[0, 1]`.
    pub probability: f64,
    pub percentage: u8,
    pub tier: Tier,
    pub breakdown: Vec<DimensionScore>,
}

impl ScoreResult {
    fn from_breakdown(breakdown: Vec<DimensionScore>) -> Self {
        let raw: f64 = breakdown.iter().map(|d| d.contribution).sum();
        let probability = raw.clamp(0.0, 1.0);
        let percentage = to_percentage(probability);
        Self {
            probability,
            percentage,
            tier: Tier::from_percentage(percentage),
            breakdown,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_percentage(probability: f64) -> u8 {
    (probability * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Scores `profile` against `reference` with the given weights.
///
/// Both `profile` and `weights` must carry exactly the reference's keys.
pub fn score(
    profile: &AttributeProfile,
    weights: &WeightVector,
    reference: &ReferenceProfile,
    sigma: f64,
) -> Result<ScoreResult, ProspectError> {
    let dimensions = reference.dimensions();
    dimensions.check_keys(profile.keys())?;
    dimensions.check_keys(weights.keys())?;

    let sigma = effective_sigma(sigma);
    let mut breakdown = Vec::with_capacity(dimensions.len());
    for (dim, mean) in reference.iter() {
        let value = profile
            .get(&dim.key)
            .ok_or_else(|| ProspectError::UnknownDimension(dim.key.clone()))?;
        let weight = weights
            .get(&dim.key)
            .ok_or_else(|| ProspectError::UnknownDimension(dim.key.clone()))?;
        let lk = likelihood(value, mean, sigma);
        breakdown.push(DimensionScore {
            key: dim.key.clone(),
            value,
            mean,
            likelihood: lk,
            weight,
            contribution: weight * lk,
        });
    }

    Ok(ScoreResult::from_breakdown(breakdown))
}

/// Reference profile and kernel width bound together.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    reference: ReferenceProfile,
    sigma: f64,
}

impl ScoringEngine {
    pub fn new(reference: ReferenceProfile, sigma: f64) -> Self {
        if !is_usable_sigma(sigma) {
            warn!(sigma, default = DEFAULT_SIGMA, "sigma must be positive, using default");
        }
        Self {
            reference,
            sigma: effective_sigma(sigma),
        }
    }

    pub fn reference(&self) -> &ReferenceProfile {
        &self.reference
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn score(
        &self,
        profile: &AttributeProfile,
        weights: &WeightVector,
    ) -> Result<ScoreResult, ProspectError> {
        let result = score(profile, weights, &self.reference, self.sigma)?;
        debug!(
            probability = result.probability,
            percentage = result.percentage,
            tier = result.tier.label(),
            "recomputed prospect score"
        );
        Ok(result)
    }
}
