//! Cached subfactorial numbers.
//!
//! `D(k)` counts the derangements of a `k`-element set and satisfies
//! `D(0) = 1`, `D(1) = 0` and `D(k) = (k - 1) * (D(k - 1) + D(k - 2))`.
//!
//! Values are kept as `f64`. They are exact integers up to `D(18)` or so and
//! become approximations after that; past `k = 170` the count no longer fits
//! in an `f64` and [`SubfactorialTable::subfactorial`] returns `+inf`. The
//! sampler never divides those raw counts. It uses the normalized sequence
//! `d(k) = D(k) / k!`, which converges to `1/e` and stays finite for every `k`.

use parking_lot::Mutex;

static SHARED: SubfactorialTable = SubfactorialTable::new();

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    count: f64,
    normalized: f64,
}

/// Append-only cache of subfactorials, safe to share between threads.
#[derive(Debug)]
pub struct SubfactorialTable {
    entries: Mutex<Vec<Entry>>,
}

impl SubfactorialTable {
    pub const fn new() -> Self {
        Self {
            entries: parking_lot::const_mutex(Vec::new()),
        }
    }

    /// The process-wide table used by [`crate::derange`].
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Number of derangements of a `k`-element set.
    pub fn subfactorial(&self, k: usize) -> f64 {
        self.entry(k).count
    }

    /// Probability that the pair just swapped with `u` open points should be
    /// closed as a 2-cycle, i.e. `(u - 1) * D(u - 2) / D(u)`.
    ///
    /// Only meaningful for `u >= 2`; returns `0.0` below that.
    pub fn closing_probability(&self, u: usize) -> f64 {
        if u < 2 {
            return 0.0;
        }

        let mut entries = self.entries.lock();
        extend(&mut entries, u);

        entries[u - 2].normalized / (u as f64 * entries[u].normalized)
    }

    /// Number of indices currently cached.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, k: usize) -> Entry {
        let mut entries = self.entries.lock();
        extend(&mut entries, k);
        entries[k]
    }
}

impl Default for SubfactorialTable {
    fn default() -> Self {
        Self::new()
    }
}

// Caller holds the lock, so reading the length and appending is one step.
fn extend(entries: &mut Vec<Entry>, k: usize) {
    if k < entries.len() {
        return;
    }

    let from = entries.len();
    entries.reserve(k + 1 - from);

    for i in from..=k {
        let entry = match i {
            0 => Entry {
                count: 1.0,
                normalized: 1.0,
            },
            1 => Entry {
                count: 0.0,
                normalized: 0.0,
            },
            _ => {
                let (a, b) = (entries[i - 1], entries[i - 2]);
                let m = (i - 1) as f64;
                Entry {
                    count: m * (a.count + b.count),
                    normalized: (m * a.normalized + b.normalized) / i as f64,
                }
            }
        };
        entries.push(entry);
    }

    tracing::trace!(from, to = k, "extended subfactorial table");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values() {
        let table = SubfactorialTable::new();

        assert_eq!(table.subfactorial(0), 1.0);
        assert_eq!(table.subfactorial(1), 0.0);
        assert_eq!(table.subfactorial(2), 1.0);
        assert_eq!(table.subfactorial(3), 2.0);
        assert_eq!(table.subfactorial(4), 9.0);
    }

    #[test]
    fn test_known_values() {
        let table = SubfactorialTable::new();

        assert_eq!(table.subfactorial(6), 265.0);
        assert_eq!(table.subfactorial(10), 1334961.0);
        assert_eq!(table.subfactorial(8), 14833.0);
    }

    #[test]
    fn test_recurrence() {
        let table = SubfactorialTable::new();

        for k in 2..=18 {
            let expected = (k - 1) as f64 * (table.subfactorial(k - 1) + table.subfactorial(k - 2));
            assert_eq!(table.subfactorial(k), expected);
        }
    }

    #[test]
    fn test_growth_is_idempotent() {
        let grown_first = SubfactorialTable::new();
        grown_first.subfactorial(20);
        let a = grown_first.subfactorial(10);

        let fresh = SubfactorialTable::new();
        let b = fresh.subfactorial(10);

        assert_eq!(a, b);
        assert_eq!(grown_first.len(), 21);
        assert_eq!(fresh.len(), 11);
    }

    #[test]
    fn test_lazy_growth() {
        let table = SubfactorialTable::new();
        assert!(table.is_empty());

        table.subfactorial(5);
        assert_eq!(table.len(), 6);

        table.subfactorial(3);
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_count_overflows_past_170() {
        let table = SubfactorialTable::new();

        assert!(table.subfactorial(170).is_finite());
        assert!(table.subfactorial(200).is_infinite());
    }

    #[test]
    fn test_closing_probability() {
        let table = SubfactorialTable::new();

        assert_eq!(table.closing_probability(0), 0.0);
        assert_eq!(table.closing_probability(1), 0.0);
        assert_eq!(table.closing_probability(2), 1.0);
        assert_eq!(table.closing_probability(3), 0.0);

        for u in 4..=18 {
            let direct = (u - 1) as f64 * table.subfactorial(u - 2) / table.subfactorial(u);
            let p = table.closing_probability(u);
            assert!((p - direct).abs() < 1e-12, "u = {u}: {p} vs {direct}");
        }
    }

    #[test]
    fn test_closing_probability_large() {
        let table = SubfactorialTable::new();

        for u in [200, 1000, 5000] {
            let p = table.closing_probability(u);
            assert!(p.is_finite());
            assert!((p * u as f64 - 1.0).abs() < 1e-3, "u = {u}: {p}");
        }
    }

    #[test]
    fn test_shared_between_threads() {
        let table = SubfactorialTable::new();

        std::thread::scope(|s| {
            for k in [30, 60, 90, 120] {
                let table = &table;
                s.spawn(move || table.subfactorial(k));
            }
        });

        assert_eq!(table.len(), 121);
        for k in 2..=120 {
            let expected = (k - 1) as f64 * (table.subfactorial(k - 1) + table.subfactorial(k - 2));
            assert_eq!(table.subfactorial(k), expected);
        }
    }
}
