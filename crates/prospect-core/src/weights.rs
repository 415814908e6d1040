use tracing::warn;

use crate::error::ProspectError;
use crate::profile::{DimensionSet, WeightVector};

/// Allowed drift of a normalized vector's sum from 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Rescales `raw` so its weights sum to 1.
///
/// A vector whose sum is zero or negative cannot be rescaled and is returned
/// unchanged; it stays unnormalized until a later edit restores a positive sum.
pub fn normalize(raw: &WeightVector) -> WeightVector {
    let sum = raw.sum();
    if sum > 0.0 {
        raw.map_values(|w| w / sum)
    } else {
        warn!(sum, "weight sum is not positive, keeping raw weights");
        raw.clone()
    }
}

/// Rejects weights that cannot take part in a probability distribution.
pub fn check_weight(key: &str, value: f64) -> Result<(), ProspectError> {
    if !value.is_finite() {
        return Err(ProspectError::NonFiniteValue {
            dimension: key.to_string(),
            value,
        });
    }
    if value < 0.0 {
        return Err(ProspectError::NegativeWeight {
            dimension: key.to_string(),
            value,
        });
    }
    Ok(())
}

/// Overwrites one field of the current normalized vector and renormalizes.
///
/// Edits compound on `prior`, not on any earlier raw history.
pub fn apply_weight_edit(
    dimensions: &DimensionSet,
    prior: &WeightVector,
    key: &str,
    raw_value: f64,
) -> Result<WeightVector, ProspectError> {
    dimensions.ensure_known(key)?;
    check_weight(key, raw_value)?;
    Ok(normalize(&prior.with_value(key, raw_value)))
}
