//! Mock value sampling
//!
//! Shared sampling helpers for `mock()` implementations. Generators take an
//! injected `rand::Rng` so callers (and tests) control determinism; nothing
//! here touches a global RNG.
//!
//! Rejection sampling is capped at [`MAX_ATTEMPTS`]; exhausting the budget is
//! reported as `ImpossibleConstraintSet` rather than looping forever.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Retry budget for rejection sampling in decimal/float mocks
pub const MAX_ATTEMPTS: usize = 1000;

/// Samples uniformly from the arithmetic progression
/// `{lo, lo + step, ..., <= hi}`.
///
/// `lo` must already be a member of the progression and `lo <= hi`; callers
/// narrow the domain (including storage bounds) before sampling, never after.
pub fn sample_progression<R: Rng + ?Sized>(rng: &mut R, lo: i64, hi: i64, step: i64) -> i64 {
    debug_assert!(step > 0 && lo <= hi);
    let count = ((hi as i128 - lo as i128) / step as i128) as u128 + 1;
    let k = rng.gen_range(0..count);
    (lo as i128 + k as i128 * step as i128) as i64
}

/// Samples uniformly from an inclusive `i128` range (decimal mantissas).
///
/// The range width must fit in `u128`, which holds for any mantissa interval
/// a `DECIMAL(p, s)` with `p <= 28` can produce.
pub fn sample_i128<R: Rng + ?Sized>(rng: &mut R, lo: i128, hi: i128) -> i128 {
    debug_assert!(lo <= hi);
    let width = (hi - lo) as u128;
    if width == u128::MAX {
        // Cannot express an inclusive full-width range; split the parity bit.
        let k = rng.gen_range(0..=u128::MAX / 2) * 2 + u128::from(rng.gen_bool(0.5));
        return lo.wrapping_add(k as i128);
    }
    let k = rng.gen_range(0..=width);
    lo + k as i128
}

/// Samples uniformly from the progression `{lo, lo + step, ..., <= hi}` over
/// `i128` mantissas.
pub fn sample_i128_progression<R: Rng + ?Sized>(
    rng: &mut R,
    lo: i128,
    hi: i128,
    step: i128,
) -> i128 {
    debug_assert!(step > 0 && lo <= hi);
    let count = ((hi - lo) / step) as u128 + 1;
    let k = rng.gen_range(0..count);
    lo + k as i128 * step
}

/// Smallest multiple of `step` that is >= `lo` (`step` positive)
pub fn first_multiple_at_or_above(lo: i128, step: i128) -> i128 {
    let rem = lo.rem_euclid(step);
    if rem == 0 {
        lo
    } else {
        lo + (step - rem)
    }
}

/// Random alphanumeric body for string mocks
pub fn alphanumeric<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// Random byte buffer for binary mocks
pub fn bytes<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rng.fill(&mut buf[..]);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_progression_stays_in_domain() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = sample_progression(&mut rng, 10, 100, 10);
            assert!((10..=100).contains(&v));
            assert_eq!(v % 10, 0);
        }
    }

    #[test]
    fn test_progression_covers_full_domain() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(sample_progression(&mut rng, 0, 30, 10));
        }
        assert_eq!(seen, [0, 10, 20, 30].into_iter().collect());
    }

    #[test]
    fn test_progression_single_value() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(sample_progression(&mut rng, 100, 100, 1), 100);
    }

    #[test]
    fn test_full_i64_range() {
        let mut rng = StdRng::seed_from_u64(5);
        // step 1 over the whole width must not overflow.
        let v = sample_progression(&mut rng, i64::MIN, i64::MAX, 1);
        let _ = v;
    }

    #[test]
    fn test_i128_interval() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..1000 {
            let v = sample_i128(&mut rng, -1_000_000_000_000_000_000_000, 10);
            assert!((-1_000_000_000_000_000_000_000..=10).contains(&v));
        }
    }

    #[test]
    fn test_alphanumeric_length_and_charset() {
        let mut rng = StdRng::seed_from_u64(17);
        let s = alphanumeric(&mut rng, 32);
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_bytes_length() {
        let mut rng = StdRng::seed_from_u64(19);
        assert_eq!(bytes(&mut rng, 16).len(), 16);
        assert!(bytes(&mut rng, 0).is_empty());
    }
}
