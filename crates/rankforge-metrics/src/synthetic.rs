//! Random sources for synthetic metrics.
//!
//! Synthetic values are only used when provider credentials are absent and
//! are always flagged `is_synthetic`. Production wiring uses
//! [`SeededRandom::from_entropy`]; tests use a fixed seed or a
//! [`SequenceRandom`] to assert exact values.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform source of values in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;

    /// Uniform value in `[lo, hi)`.
    fn in_range(&self, lo: f64, hi: f64) -> f64 {
        lo + self.next_unit() * (hi - lo)
    }
}

/// `StdRng`-backed source.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        // A poisoned lock still holds a usable generator.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.r#gen::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: Mutex<usize>,
}

impl SequenceRandom {
    /// Values are clamped into `[0, 1)`. An empty list behaves as `[0.0]`.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let mut values: Vec<f64> = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 0.999_999))
            .collect();
        if values.is_empty() {
            values.push(0.0);
        }
        Self {
            values,
            cursor: Mutex::new(0),
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&self) -> f64 {
        let mut cursor = self.cursor.lock().unwrap_or_else(|e| e.into_inner());
        let v = self.values[*cursor % self.values.len()];
        *cursor += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_is_reproducible() {
        let a = SeededRandom::with_seed(42);
        let b = SeededRandom::with_seed(42);
        let xs: Vec<f64> = (0..5).map(|_| a.next_unit()).collect();
        let ys: Vec<f64> = (0..5).map(|_| b.next_unit()).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn sequence_cycles() {
        let r = SequenceRandom::new(vec![0.1, 0.2]);
        assert_eq!(r.next_unit(), 0.1);
        assert_eq!(r.next_unit(), 0.2);
        assert_eq!(r.next_unit(), 0.1);
    }

    #[test]
    fn in_range_scales() {
        let r = SequenceRandom::constant(0.5);
        assert_eq!(r.in_range(10.0, 90.0), 50.0);
    }

    #[test]
    fn empty_sequence_yields_zero() {
        let r = SequenceRandom::new(Vec::new());
        assert_eq!(r.next_unit(), 0.0);
    }
}
