//! Direct sampling of uniformly random derangements.
//!
//! This is the method of Martínez, Panholzer and Prodinger ("Generating
//! random derangements", 2008). Positions are scanned from the top down.
//! Each open position is swapped with a random open position below it, and
//! the pair is then either closed as a 2-cycle or left open to grow into a
//! longer cycle. The closing probability is the share of derangements of the
//! `u` open points in which that pair forms a 2-cycle, `(u - 1) D(u - 2) / D(u)`,
//! which makes every derangement equally likely. Expected running time is
//! linear in `n`.

use rand::Rng;

use crate::error::{PreconditionError, Result};
use crate::subfactorial::SubfactorialTable;

/// Source of the two kinds of uniform draws the sampler needs.
///
/// Implemented for every [`rand::Rng`].
pub trait RandomSource {
    /// Uniform integer in `[0, k)`. `k` is always positive.
    fn index_below(&mut self, k: usize) -> usize;

    /// Uniform real in `[0, 1)`.
    fn unit(&mut self) -> f64;
}

impl<R: Rng> RandomSource for R {
    fn index_below(&mut self, k: usize) -> usize {
        self.random_range(0..k)
    }

    fn unit(&mut self) -> f64 {
        self.random()
    }
}

/// Returns the images of `0..n` under a uniformly random derangement.
pub(crate) fn sample<R: RandomSource + ?Sized>(
    n: usize,
    table: &SubfactorialTable,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if n == 1 {
        tracing::debug!("rejected derangement of a single element");
        return Err(PreconditionError::SingleElement);
    }

    let mut perm = (0..n).collect::<Vec<_>>();
    let mut closed = vec![false; n];
    let mut open = n;
    let mut two_cycles = 0;

    // `open` counts the unclosed positions in `0..=i`, so whenever `i` is
    // open and `open >= 2` there is an open position below it.
    let mut i = n.wrapping_sub(1);
    while open >= 2 {
        if !closed[i] {
            let j = loop {
                let j = rng.index_below(i);
                if !closed[j] {
                    break j;
                }
            };

            perm.swap(i, j);

            if rng.unit() < table.closing_probability(open) {
                closed[j] = true;
                open -= 1;
                two_cycles += 1;
            }
            open -= 1;
        }
        i -= 1;
    }

    tracing::debug!(n, two_cycles, "sampled derangement");

    Ok(perm)
}
