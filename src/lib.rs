//! Uniformly random derangements for gift-exchange matching.
//!
//! A derangement is a permutation with no fixed points: nobody is assigned
//! to give a gift to themselves. [`derange`] samples one uniformly among all
//! derangements of `n` points, and [`pair`] turns it into `(giver, receiver)`
//! pairs over caller-supplied identifiers.
//!
//! ```
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256StarStar;
//!
//! let mut rng = Xoshiro256StarStar::seed_from_u64(1);
//! let pairs = derangement_sampler::assign(&["ana", "bia", "caio"], &mut rng).unwrap();
//!
//! assert_eq!(pairs.len(), 3);
//! assert!(pairs.iter().all(|(giver, receiver)| giver != receiver));
//! ```

mod error;
mod pairing;
mod sampler;
mod subfactorial;

pub use error::{PreconditionError, Result};
pub use pairing::{assign, assign_with_table, pair, receiver_of};
pub use sampler::RandomSource;
pub use subfactorial::SubfactorialTable;

pub trait Permutation: Sized {
    fn num_points(&self) -> usize;
    fn nth(&self, n: usize) -> Option<usize>;

    fn iter(&self) -> PermutationIter<'_, Self> {
        PermutationIter { perm: self, idx: 0 }
    }
}

/// A permutation of `0..n` with no fixed points.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Derangement {
    images: Vec<usize>,
}

impl Derangement {
    #[cfg(feature = "thread_rng")]
    pub fn new(n: usize) -> Result<Self> {
        Self::with_rng(n, &mut rand::rng())
    }

    pub fn with_rng<R: RandomSource + ?Sized>(n: usize, rng: &mut R) -> Result<Self> {
        Self::with_table(n, SubfactorialTable::shared(), rng)
    }

    pub fn with_table<R: RandomSource + ?Sized>(
        n: usize,
        table: &SubfactorialTable,
        rng: &mut R,
    ) -> Result<Self> {
        let images = sampler::sample(n, table, rng)?;
        Ok(Self { images })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.images
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.images
    }

    /// The derangement mapping each receiver back to its giver.
    pub fn inverse(&self) -> Inverse<'_> {
        Inverse { perm: self }
    }
}

impl Permutation for Derangement {
    fn num_points(&self) -> usize {
        self.images.len()
    }

    fn nth(&self, n: usize) -> Option<usize> {
        self.images.get(n).copied()
    }
}

impl TryFrom<Vec<usize>> for Derangement {
    type Error = PreconditionError;

    fn try_from(images: Vec<usize>) -> Result<Self> {
        let mut seen = vec![false; images.len()];

        for (i, &x) in images.iter().enumerate() {
            if x == i || x >= images.len() || seen[x] {
                return Err(PreconditionError::NotADerangement);
            }
            seen[x] = true;
        }

        Ok(Self { images })
    }
}

impl AsRef<[usize]> for Derangement {
    fn as_ref(&self) -> &[usize] {
        &self.images
    }
}

pub struct Inverse<'a> {
    perm: &'a Derangement,
}

impl Permutation for Inverse<'_> {
    fn num_points(&self) -> usize {
        self.perm.num_points()
    }

    fn nth(&self, n: usize) -> Option<usize> {
        self.perm.images.iter().position(|&a| a == n)
    }
}

pub struct PermutationIter<'a, P: Permutation> {
    perm: &'a P,
    idx: usize,
}

impl<P: Permutation> Iterator for PermutationIter<'_, P> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let a = self.perm.nth(self.idx);
        self.idx += 1;
        a
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.idx += n;
        self.next()
    }
}

/// Samples a uniformly random derangement of `0..n`.
///
/// Uses the process-wide [`SubfactorialTable::shared`] table. `n == 0`
/// yields the empty derangement.
///
/// # Errors
///
/// Returns [`PreconditionError::SingleElement`] when `n == 1`.
pub fn derange<R: RandomSource + ?Sized>(n: usize, rng: &mut R) -> Result<Derangement> {
    Derangement::with_rng(n, rng)
}

/// Like [`derange`], with an explicitly owned table.
pub fn derange_with_table<R: RandomSource + ?Sized>(
    n: usize,
    table: &SubfactorialTable,
    rng: &mut R,
) -> Result<Derangement> {
    Derangement::with_table(n, table, rng)
}
