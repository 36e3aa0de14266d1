//! Random source for bitrate selection
//!
//! The degrader draws one bitrate per iteration through this seam so tests
//! can replace the draw with a fixed sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Capability to pick an index uniformly from `0..len`
pub trait RandomSource {
    /// Return an index in `0..len`. `len` is never zero.
    fn choose_index(&mut self, len: usize) -> usize;
}

/// Adapter over any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    /// Seeded generator for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        RngSource(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        RngSource(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn choose_index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

/// Deterministic source cycling through a fixed list of indices
///
/// Each index is reduced modulo `len`, so any list is usable with any pool.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    indices: Vec<usize>,
    position: usize,
}

impl SequenceSource {
    pub fn new(indices: Vec<usize>) -> Self {
        Self {
            indices,
            position: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn choose_index(&mut self, len: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let index = self.indices[self.position % self.indices.len()];
        self.position += 1;
        index % len
    }
}

impl<S: RandomSource + ?Sized> RandomSource for Box<S> {
    fn choose_index(&mut self, len: usize) -> usize {
        (**self).choose_index(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_source_in_range() {
        let mut source = RngSource::seeded(7);
        for len in 1..20 {
            for _ in 0..50 {
                assert!(source.choose_index(len) < len);
            }
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        let draws_a: Vec<usize> = (0..32).map(|_| a.choose_index(5)).collect();
        let draws_b: Vec<usize> = (0..32).map(|_| b.choose_index(5)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn test_sequence_cycles_and_wraps() {
        let mut source = SequenceSource::new(vec![0, 4, 7]);
        let draws: Vec<usize> = (0..6).map(|_| source.choose_index(5)).collect();
        assert_eq!(draws, vec![0, 4, 2, 0, 4, 2]);
    }

    #[test]
    fn test_empty_sequence_picks_first() {
        let mut source = SequenceSource::new(Vec::new());
        assert_eq!(source.choose_index(3), 0);
    }
}
