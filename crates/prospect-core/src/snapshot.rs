//! Read-only views of the store shaped for chart rendering.

use serde::Serialize;

use crate::presets::FULL_MARK;
use crate::scoring::{ScoreResult, Tier};
use crate::store::ProfileStore;

/// Prospect value next to the reference mean for one dimension. Feeds both
/// the radar and the side-by-side bar comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributePoint {
    pub key: String,
    pub subject: String,
    pub prospect: f64,
    pub reference: f64,
    pub full_mark: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightShare {
    pub key: String,
    pub name: String,
    pub value: f64,
    /// `round(value * 100)`, as shown next to each weight slider.
    pub percent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub percentage: u8,
    pub remaining: u8,
    pub tier: Tier,
    pub label: &'static str,
}

impl From<&ScoreResult> for ScoreSummary {
    fn from(score: &ScoreResult) -> Self {
        Self {
            percentage: score.percentage,
            remaining: 100 - score.percentage,
            tier: score.tier,
            label: score.tier.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSnapshot {
    pub name: String,
    pub attributes: Vec<AttributePoint>,
    pub weights: Vec<WeightShare>,
    pub summary: ScoreSummary,
    pub score: ScoreResult,
}

#[allow(clippy::cast_possible_truncation)]
fn rounded_percent(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

impl ProfileStore {
    /// Attribute points in dimension order.
    pub fn attribute_points(&self) -> Vec<AttributePoint> {
        self.reference()
            .iter()
            .map(|(dim, mean)| AttributePoint {
                key: dim.key.clone(),
                subject: dim.label.clone(),
                prospect: self.profile().get(&dim.key).unwrap_or(mean),
                reference: mean,
                full_mark: FULL_MARK,
            })
            .collect()
    }

    /// Weight shares in dimension order.
    pub fn weight_shares(&self) -> Vec<WeightShare> {
        self.dimensions()
            .iter()
            .map(|dim| {
                let value = self.weights().get(&dim.key).unwrap_or_default();
                WeightShare {
                    key: dim.key.clone(),
                    name: dim.label.clone(),
                    value,
                    percent: rounded_percent(value),
                }
            })
            .collect()
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        let score = self.current_score().clone();
        ProfileSnapshot {
            name: self.name().to_string(),
            attributes: self.attribute_points(),
            weights: self.weight_shares(),
            summary: ScoreSummary::from(&score),
            score,
        }
    }
}
