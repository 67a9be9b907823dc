//! Chaotic keystream generation using the logistic map
//! `x(n+1) = mu * x(n) * (1 - x(n))` with `mu` in the chaotic regime.
//!
//! The map is iterated in fixed-point arithmetic (Q0.64 state, Q64.64
//! parameter) so that a given seed produces a bit-identical sequence on
//! every platform; a floating-point recurrence would be at the mercy of
//! rounding differences. Two streams built from the same seed yield
//! identical draws for any length, which is what makes every decode the
//! exact inverse of its encode.

use crate::key::KeySeed;

/// 1.0 in Q64.64.
const ONE: u128 = 1 << 64;

/// mu lower bound, 3.8 in Q64.64. Together with `MU_SPAN` this keeps the
/// map inside [3.8, 4.0), a strongly chaotic band.
const MU_MIN: u128 = (19 * ONE) / 5;

/// mu derivation span, 0.2 in Q64.64.
const MU_SPAN: u128 = ONE / 5;

/// x0 lower bound, 0.05 in Q0.64; the derived state lands in [0.05, 0.95)
/// away from the fixed points at 0 and 1.
const X_MIN: u64 = (ONE / 20) as u64;

/// x0 derivation span, 0.9 in Q0.64.
const X_SPAN: u128 = (9 * ONE) / 10;

/// Iterations discarded after seeding, before any output is drawn.
const WARMUP: usize = 1000;

/// Replacement state should truncation ever drive the iterate to the
/// absorbing fixed point at zero.
const REINJECT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Logistic-map keystream generator.
///
/// One instance is constructed per operation and owned exclusively by that
/// call; there is no shared or global map state.
pub struct ChaoticStream {
    /// Current iterate, Q0.64.
    x: u64,
    /// Map parameter, Q64.64.
    mu: u128,
}

impl ChaoticStream {
    /// Build a stream from derived seed material.
    ///
    /// The initial state comes from the first eight seed bytes and the map
    /// parameter from the next eight, each mapped into its safe band. The
    /// transient is skipped so output starts well inside the attractor.
    pub fn from_seed(seed: &KeySeed) -> Self {
        let bytes = seed.as_bytes();
        let x_frac = u64::from_be_bytes(bytes[0..8].try_into().unwrap());
        let mu_frac = u64::from_be_bytes(bytes[8..16].try_into().unwrap());

        let x = X_MIN + ((x_frac as u128 * X_SPAN) >> 64) as u64;
        let mu = MU_MIN + ((mu_frac as u128 * MU_SPAN) >> 64);

        let mut stream = Self { x, mu };
        for _ in 0..WARMUP {
            stream.step();
        }
        stream
    }

    /// Advance the map one iteration and return the new state.
    ///
    /// Computes `x' = mu * x * (1 - x)` in Q64.64:
    /// `t = x * (1 - x)` keeps 64 fractional bits, then the `mu` product is
    /// renormalized back to Q0.64.
    fn step(&mut self) -> u64 {
        let x = self.x as u128;
        let t = (x * (ONE - x)) >> 64;
        self.x = ((self.mu * t) >> 64) as u64;
        if self.x == 0 {
            self.x = REINJECT;
        }
        self.x
    }

    /// Next keystream byte, quantized from the iterate.
    pub fn next_byte(&mut self) -> u8 {
        (self.step() >> 24) as u8
    }

    /// Next index in `[0, bound)`.
    ///
    /// Multiply-shift quantization rather than modulo reduction, so no
    /// residue class is favored. `bound` must be nonzero.
    pub fn next_index(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        ((self.step() as u128 * bound as u128) >> 64) as usize
    }

    /// Generate a permutation of `0..len` by Fisher-Yates, driven by the
    /// chaotic stream. Every position appears exactly once, so repeated
    /// draws never collide.
    pub fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..len).collect();
        for i in (1..len).rev() {
            let j = self.next_index(i + 1);
            perm.swap(i, j);
        }
        perm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key;

    #[test]
    fn test_determinism() {
        let seed = key::derive("test_password").unwrap();
        let mut a = ChaoticStream::from_seed(&seed);
        let mut b = ChaoticStream::from_seed(&seed);

        for _ in 0..1000 {
            assert_eq!(a.next_byte(), b.next_byte());
        }
    }

    #[test]
    fn test_seed_sensitivity() {
        let mut a = ChaoticStream::from_seed(&key::derive("password1").unwrap());
        let mut b = ChaoticStream::from_seed(&key::derive("password2").unwrap());

        let draws_a: Vec<u8> = (0..64).map(|_| a.next_byte()).collect();
        let draws_b: Vec<u8> = (0..64).map(|_| b.next_byte()).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn test_index_range() {
        let seed = key::derive("test").unwrap();
        let mut stream = ChaoticStream::from_seed(&seed);
        for bound in [1usize, 2, 3, 7, 256, 10_000] {
            for _ in 0..100 {
                assert!(stream.next_index(bound) < bound);
            }
        }
    }

    #[test]
    fn test_permutation_validity() {
        let seed = key::derive("test").unwrap();
        let mut stream = ChaoticStream::from_seed(&seed);
        let perm = stream.permutation(1000);

        assert_eq!(perm.len(), 1000);
        let mut sorted = perm.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 1000);
    }

    #[test]
    fn test_permutation_restartable() {
        let seed = key::derive("same seed").unwrap();
        let p1 = ChaoticStream::from_seed(&seed).permutation(512);
        let p2 = ChaoticStream::from_seed(&seed).permutation(512);
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_state_never_sticks_at_zero() {
        let seed = key::derive("zero orbit probe").unwrap();
        let mut stream = ChaoticStream::from_seed(&seed);
        let mut nonzero = 0;
        for _ in 0..10_000 {
            if stream.next_byte() != 0 {
                nonzero += 1;
            }
        }
        // A stalled map would emit a constant stream of zero bytes
        assert!(nonzero > 5000);
    }
}
