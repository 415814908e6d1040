use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ProspectError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub key: String,
    pub label: String,
}

impl Dimension {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Ordered, fixed set of evaluation dimensions.
///
/// The order is presentation order; lookups are by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DimensionSet {
    dimensions: Vec<Dimension>,
}

impl DimensionSet {
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self, ProspectError> {
        if dimensions.is_empty() {
            return Err(ProspectError::EmptyDimensionSet);
        }
        for (i, dim) in dimensions.iter().enumerate() {
            if dimensions.iter().skip(i + 1).any(|other| other.key == dim.key) {
                return Err(ProspectError::DuplicateDimension(dim.key.clone()));
            }
        }
        Ok(Self { dimensions })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.dimensions.iter().any(|d| d.key == key)
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|d| d.key == key)
            .map(|d| d.label.as_str())
    }

    pub fn ensure_known(&self, key: &str) -> Result<(), ProspectError> {
        if self.contains(key) {
            Ok(())
        } else {
            Err(ProspectError::UnknownDimension(key.to_string()))
        }
    }

    /// Fails unless `keys` is exactly this set's key set.
    pub fn check_keys<'a>(&self, keys: impl Iterator<Item = &'a str>) -> Result<(), ProspectError> {
        let found: Vec<String> = keys.map(str::to_string).collect();
        let same = found.len() == self.len() && found.iter().all(|k| self.contains(k));
        if same {
            Ok(())
        } else {
            Err(ProspectError::ShapeMismatch {
                expected: self.keys().map(str::to_string).collect(),
                found,
            })
        }
    }
}

/// Observed attribute values of the subject being evaluated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeProfile {
    values: BTreeMap<String, f64>,
}

impl AttributeProfile {
    pub fn new<K: Into<String>>(values: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self {
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Copy of this profile with one field overwritten.
    pub fn with_value(&self, key: &str, value: f64) -> Self {
        let mut next = self.clone();
        next.values.insert(key.to_string(), value);
        next
    }
}

/// Relative importance of each dimension.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector {
    weights: BTreeMap<String, f64>,
}

impl WeightVector {
    pub fn new<K: Into<String>>(weights: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self {
            weights: weights.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.weights.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= crate::weights::WEIGHT_SUM_TOLERANCE
    }

    pub fn with_value(&self, key: &str, value: f64) -> Self {
        let mut next = self.clone();
        next.weights.insert(key.to_string(), value);
        next
    }

    pub(crate) fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            weights: self
                .weights
                .iter()
                .map(|(k, v)| (k.clone(), f(*v)))
                .collect(),
        }
    }
}

/// Population baseline every profile is compared against. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceProfile {
    dimensions: DimensionSet,
    means: BTreeMap<String, f64>,
}

impl ReferenceProfile {
    pub fn new(entries: Vec<(Dimension, f64)>) -> Result<Self, ProspectError> {
        for (dim, mean) in &entries {
            if !mean.is_finite() {
                return Err(ProspectError::NonFiniteValue {
                    dimension: dim.key.clone(),
                    value: *mean,
                });
            }
        }
        let means = entries
            .iter()
            .map(|(dim, mean)| (dim.key.clone(), *mean))
            .collect();
        let dimensions = DimensionSet::new(entries.into_iter().map(|(dim, _)| dim).collect())?;
        Ok(Self { dimensions, means })
    }

    pub fn dimensions(&self) -> &DimensionSet {
        &self.dimensions
    }

    pub fn mean(&self, key: &str) -> Option<f64> {
        self.means.get(key).copied()
    }

    /// `(dimension, mean)` pairs in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (&Dimension, f64)> {
        self.dimensions
            .iter()
            .filter_map(|dim| self.means.get(&dim.key).map(|mean| (dim, *mean)))
    }
}
