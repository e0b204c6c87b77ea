//! Pure numeric normalization: reducing a value to a mantissa confined to a base-10 window plus a
//! decimal exponent, and snapping near-integer floats for display.

use std::collections::{HashMap, VecDeque};

use thiserror::Error;

/// Snap tolerance exponent used when nothing else is configured: values within `10^-13` of an
/// integer display as that integer.
pub const DEFAULT_ACCURACY: i32 = 13;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormError {
    #[error("normalization window must be positive, got {0}")]
    InvalidConfiguration(i32),
}

/// Reduces `value` to `(mantissa, exponent)` with `|mantissa| < 10^window` and
/// `mantissa * 10^exponent == value` (within float tolerance), by repeated division by
/// `10^window`. The exponent is a decimal exponent, so it grows in steps of `window`.
///
/// There is no lower-bound correction: `0.0001` comes back unchanged with exponent 0. The window
/// is asymmetric on purpose and equality of normalized values depends on it staying that way.
pub fn reduce_to_window(value: f64, window: i32) -> Result<(f64, i32), NormError> {
    if window <= 0 {
        return Err(NormError::InvalidConfiguration(window));
    }
    Ok(reduce(value, window))
}

/// The reduction loop itself, for callers that have already validated the window.
pub(crate) fn reduce(value: f64, window: i32) -> (f64, i32) {
    // An infinite value would never leave the loop.
    if !value.is_finite() {
        return (value, 0);
    }
    let step = 10f64.powi(window);
    let mut mantissa = value;
    let mut exponent = 0;
    while mantissa.abs() >= step {
        mantissa /= step;
        exponent += window;
    }
    (mantissa, exponent)
}

/// Returns the nearest integer if `value` is within `10^-accuracy` of it, otherwise `value`
/// unchanged. Display-only: equality of quantities never goes through here.
pub fn snap_near_integer(value: f64, accuracy: i32) -> f64 {
    let nearest = value.round();
    if (nearest - value).abs() < 10f64.powi(-accuracy) {
        nearest
    } else {
        value
    }
}

/// Rounds to `places` decimal places, half away from zero.
pub(crate) fn round_to_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// A bounded memoization table for [`reduce_to_window`], keyed by exact input bits. Owned by the
/// caller and never consulted by the arithmetic path on its own; results are identical to the
/// uncached function. Once `capacity` entries are stored, the oldest entry is evicted, so
/// arbitrary floating-point keys cannot grow the table without bound.
#[derive(Debug, Clone)]
pub struct NormCache {
    capacity: usize,
    entries: HashMap<(u64, i32), (f64, i32)>,
    order: VecDeque<(u64, i32)>,
}

impl NormCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Cached [`reduce_to_window`].
    pub fn reduce_to_window(&mut self, value: f64, window: i32) -> Result<(f64, i32), NormError> {
        let key = (value.to_bits(), window);
        if let Some(&hit) = self.entries.get(&key) {
            return Ok(hit);
        }
        let result = reduce_to_window(value, window)?;
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key, result);
        self.order.push_back(key);
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::relative_eq;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_reduce_basic() {
        assert_eq!(reduce_to_window(756.0, 1).unwrap(), (7.56, 2));
        assert_eq!(reduce_to_window(70.0, 1).unwrap(), (7.0, 1));
        assert_eq!(reduce_to_window(9.8, 1).unwrap(), (9.8, 0));
        assert_eq!(reduce_to_window(0.0, 1).unwrap(), (0.0, 0));
        assert_eq!(reduce_to_window(-125.0, 1).unwrap(), (-1.25, 2));
    }

    #[test]
    fn test_reduce_wider_window() {
        assert_eq!(reduce_to_window(756.0, 2).unwrap(), (7.56, 2));
        // 12.345 already sits inside (-100, 100).
        assert_eq!(reduce_to_window(12.345, 2).unwrap(), (12.345, 0));
        assert_eq!(reduce_to_window(123400.0, 2).unwrap(), (12.34, 4));
    }

    #[test]
    fn test_no_lower_bound() {
        assert_eq!(reduce_to_window(0.0001, 1).unwrap(), (0.0001, 0));
    }

    #[test]
    fn test_invalid_window() {
        assert_eq!(
            reduce_to_window(5.0, 0),
            Err(NormError::InvalidConfiguration(0))
        );
        assert_eq!(
            reduce_to_window(5.0, -2),
            Err(NormError::InvalidConfiguration(-2))
        );
    }

    #[test]
    fn test_reduce_non_finite() {
        assert_eq!(reduce_to_window(f64::INFINITY, 1).unwrap(), (f64::INFINITY, 0));
        let (m, e) = reduce_to_window(f64::NAN, 1).unwrap();
        assert!(m.is_nan());
        assert_eq!(e, 0);
    }

    #[test]
    fn test_snap() {
        assert_eq!(snap_near_integer(9.000000000000002, 13), 9.0);
        assert_eq!(snap_near_integer(-4.999999999999999, 13), -5.0);
        assert_eq!(snap_near_integer(9.2, 13), 9.2);
        // Just outside the tolerance.
        assert_eq!(snap_near_integer(9.0001, 13), 9.0001);
        // A looser accuracy pulls it in.
        assert_eq!(snap_near_integer(9.0001, 3), 9.0);
    }

    #[test]
    fn test_round_to_places() {
        assert_eq!(round_to_places(0.021084964598084132, 3), 0.021);
        assert_eq!(round_to_places(9.201738966086792, 1), 9.2);
        assert_eq!(round_to_places(-2.35, 1), -2.4);
    }

    #[test]
    fn test_cache_is_transparent() {
        let mut cache = NormCache::new(16);
        for x in [756.0, 0.0001, -9.8, 756.0] {
            assert_eq!(
                cache.reduce_to_window(x, 1).unwrap(),
                reduce_to_window(x, 1).unwrap()
            );
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.reduce_to_window(5.0, 0), Err(NormError::InvalidConfiguration(0)));
    }

    #[test]
    fn test_cache_stays_bounded() {
        let mut cache = NormCache::new(4);
        for i in 0..100 {
            cache.reduce_to_window(i as f64 * 1.5, 1).unwrap();
        }
        assert_eq!(cache.len(), 4);
        // Evicted entries still recompute correctly.
        assert_eq!(cache.reduce_to_window(0.0, 1).unwrap(), (0.0, 0));
    }

    proptest! {
        #[test]
        fn prop_reduce_window_invariant(x in -1e15f64..1e15, w in 1i32..=3) {
            let (m, e) = reduce_to_window(x, w).unwrap();
            prop_assert!(m.abs() < 10f64.powi(w));
            prop_assert!(e % w == 0);
            prop_assert!(relative_eq!(m * 10f64.powi(e), x, max_relative = 1e-9));
        }
    }
}
