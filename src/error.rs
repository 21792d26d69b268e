use thiserror::Error;

/// A caller asked for something that cannot exist.
///
/// Every check happens before any sampling work starts, so an error never
/// comes with a partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("no derangement of a single element exists")]
    SingleElement,

    #[error("at least two participants are required for matching, got {len}")]
    TooFewIdentifiers { len: usize },

    #[error("{identifiers} identifiers cannot be paired by a derangement of {points} points")]
    LengthMismatch { identifiers: usize, points: usize },

    #[error("not a fixed-point-free permutation")]
    NotADerangement,
}

pub type Result<T, E = PreconditionError> = std::result::Result<T, E>;
