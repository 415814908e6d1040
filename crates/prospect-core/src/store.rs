use tracing::{debug, warn};

use crate::config::{AttributeRangePolicy, EngineConfig};
use crate::error::ProspectError;
use crate::presets;
use crate::profile::{AttributeProfile, DimensionSet, ReferenceProfile, WeightVector};
use crate::scoring::{ScoreResult, ScoringEngine};
use crate::weights::{apply_weight_edit, check_weight, normalize};

/// Current prospect, its weights, and the score derived from them.
///
/// Every mutator recomputes the score before returning. A rejected edit
/// leaves the store exactly as it was.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    name: String,
    profile: AttributeProfile,
    weights: WeightVector,
    engine: ScoringEngine,
    range_policy: AttributeRangePolicy,
    score: ScoreResult,
}

impl ProfileStore {
    pub fn new(
        name: impl Into<String>,
        profile: AttributeProfile,
        weights: WeightVector,
        reference: ReferenceProfile,
        config: &EngineConfig,
    ) -> Result<Self, ProspectError> {
        let dimensions = reference.dimensions();
        dimensions.check_keys(profile.keys())?;
        dimensions.check_keys(weights.keys())?;

        let range_policy = config.range_policy;
        let mut checked = Vec::with_capacity(dimensions.len());
        for (key, value) in profile.iter() {
            checked.push((key.to_string(), range_policy.apply(key, value)?));
        }
        let profile = AttributeProfile::new(checked);

        for (key, value) in weights.iter() {
            check_weight(key, value)?;
        }
        let weights = normalize(&weights);

        let engine = ScoringEngine::new(reference, config.sigma);
        let score = engine.score(&profile, &weights)?;
        Ok(Self {
            name: name.into(),
            profile,
            weights,
            engine,
            range_policy,
            score,
        })
    }

    /// Store seeded with the default four-dimension prospect.
    pub fn with_defaults(config: &EngineConfig) -> Result<Self, ProspectError> {
        Self::new(
            presets::DEFAULT_PROFILE_NAME,
            presets::rookie_profile(),
            presets::default_weights(),
            presets::all_star_reference()?,
            config,
        )
    }

    pub fn set_attribute(&mut self, name: &str, value: f64) -> Result<&ScoreResult, ProspectError> {
        self.dimensions().ensure_known(name)?;
        let value = self.range_policy.apply(name, value)?;
        let profile = self.profile.with_value(name, value);
        let score = self.engine.score(&profile, &self.weights)?;
        debug!(dimension = name, value, "attribute updated");
        self.profile = profile;
        self.score = score;
        Ok(&self.score)
    }

    pub fn set_weight(&mut self, name: &str, value: f64) -> Result<&ScoreResult, ProspectError> {
        let weights = apply_weight_edit(self.dimensions(), &self.weights, name, value)?;
        let score = self.engine.score(&self.profile, &weights)?;
        if weights.is_normalized() {
            debug!(dimension = name, value, "weight updated");
        } else {
            warn!(dimension = name, value, sum = weights.sum(), "weights left unnormalized");
        }
        self.weights = weights;
        self.score = score;
        Ok(&self.score)
    }

    /// Label only; the score is unaffected.
    pub fn set_profile_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn current_score(&self) -> &ScoreResult {
        &self.score
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile(&self) -> &AttributeProfile {
        &self.profile
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    pub fn reference(&self) -> &ReferenceProfile {
        self.engine.reference()
    }

    pub fn dimensions(&self) -> &DimensionSet {
        self.engine.reference().dimensions()
    }

    pub fn sigma(&self) -> f64 {
        self.engine.sigma()
    }

    pub fn range_policy(&self) -> AttributeRangePolicy {
        self.range_policy
    }
}
