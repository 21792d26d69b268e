//! Turning a derangement into `(giver, receiver)` pairs.

use crate::error::{PreconditionError, Result};
use crate::sampler::RandomSource;
use crate::subfactorial::SubfactorialTable;
use crate::Derangement;

/// Pairs `identifiers[i]` with `identifiers[derangement[i]]`.
///
/// Every identifier appears once as a giver and once as a receiver, and
/// since a derangement has no fixed points nobody is paired with themselves.
///
/// # Errors
///
/// [`PreconditionError::TooFewIdentifiers`] for fewer than two identifiers,
/// [`PreconditionError::LengthMismatch`] when the derangement covers a
/// different number of points.
pub fn pair<T: Clone>(identifiers: &[T], derangement: &Derangement) -> Result<Vec<(T, T)>> {
    check_len(identifiers)?;

    if identifiers.len() != derangement.len() {
        tracing::debug!(
            identifiers = identifiers.len(),
            points = derangement.len(),
            "rejected pairing"
        );
        return Err(PreconditionError::LengthMismatch {
            identifiers: identifiers.len(),
            points: derangement.len(),
        });
    }

    Ok(identifiers
        .iter()
        .zip(derangement.as_slice())
        .map(|(giver, &to)| (giver.clone(), identifiers[to].clone()))
        .collect())
}

/// Samples a derangement over `identifiers` and pairs them.
///
/// Fewer than two identifiers are rejected before any randomness is drawn.
pub fn assign<T: Clone, R: RandomSource + ?Sized>(
    identifiers: &[T],
    rng: &mut R,
) -> Result<Vec<(T, T)>> {
    assign_with_table(identifiers, SubfactorialTable::shared(), rng)
}

pub fn assign_with_table<T: Clone, R: RandomSource + ?Sized>(
    identifiers: &[T],
    table: &SubfactorialTable,
    rng: &mut R,
) -> Result<Vec<(T, T)>> {
    check_len(identifiers)?;

    let derangement = Derangement::with_table(identifiers.len(), table, rng)?;
    pair(identifiers, &derangement)
}

/// The receiver assigned to `giver`, if `giver` is in `pairs`.
pub fn receiver_of<'a, T: PartialEq>(pairs: &'a [(T, T)], giver: &T) -> Option<&'a T> {
    pairs
        .iter()
        .find(|(g, _)| g == giver)
        .map(|(_, receiver)| receiver)
}

fn check_len<T>(identifiers: &[T]) -> Result<()> {
    if identifiers.len() < 2 {
        tracing::debug!(len = identifiers.len(), "not enough participants to match");
        return Err(PreconditionError::TooFewIdentifiers {
            len: identifiers.len(),
        });
    }
    Ok(())
}
