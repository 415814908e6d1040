use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProspectError {
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("dimension set must not be empty")]
    EmptyDimensionSet,

    #[error("duplicate dimension: {0}")]
    DuplicateDimension(String),

    #[error("dimension key mismatch: expected [{}], found [{}]", .expected.join(", "), .found.join(", "))]
    ShapeMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("non-finite value for {dimension}: {value}")]
    NonFiniteValue { dimension: String, value: f64 },

    #[error("negative weight for {dimension}: {value}")]
    NegativeWeight { dimension: String, value: f64 },

    #[error("value for {dimension} out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        dimension: String,
        value: f64,
        min: f64,
        max: f64,
    },
}
