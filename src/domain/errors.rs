use thiserror::Error;

/// Errors raised by the normalization and correlation core.
///
/// Degenerate statistics (zero variance, segments shorter than two points)
/// are not errors: they surface as NaN in the computed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelationError {
    #[error("Empty input: {what}")]
    EmptyInput { what: String },

    #[error(
        "Series length mismatch for {entity}: {length} points, reference entity {reference_entity} has {reference_length}"
    )]
    MismatchedLength {
        entity: String,
        length: usize,
        reference_entity: String,
        reference_length: usize,
    },

    #[error("Invalid {name}: {value} (must be at least 1)")]
    InvalidParameter { name: &'static str, value: usize },
}
