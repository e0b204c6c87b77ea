//! Explicit normalization configuration, threaded into constructors instead of living in
//! process-wide globals so behavior is reproducible per call.

use crate::norm::{self, NormError, DEFAULT_ACCURACY};

/// The window width used when nothing else is configured: mantissas in (-10, 10).
pub const DEFAULT_WINDOW: i32 = 1;

/// Knobs consumed by normalization and rendering.
///
/// The window is validated once, at construction, so nothing downstream has to re-check it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    window: i32,
    /// Whether normalization runs the ungroup/group pass after every mutation.
    pub autogrouping: bool,
    /// Whether near-integer snapping applies to rendered mantissas at all.
    pub rounding: bool,
    /// When a value is not near an integer, round it to `accuracy` decimal places instead of
    /// showing it raw.
    pub extended_accurate: bool,
    /// Snap tolerance exponent: values within `10^-accuracy` of an integer snap to it.
    pub accuracy: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            autogrouping: true,
            rounding: true,
            extended_accurate: false,
            accuracy: DEFAULT_ACCURACY,
        }
    }
}

impl Config {
    /// Creates a configuration with the given window width, failing on non-positive windows.
    pub fn new(window: i32) -> Result<Self, NormError> {
        if window <= 0 {
            return Err(NormError::InvalidConfiguration(window));
        }
        Ok(Self {
            window,
            ..Self::default()
        })
    }

    /// The normalization window width, guaranteed positive.
    pub fn window(&self) -> i32 {
        self.window
    }

    /// Returns the configuration with autogrouping switched on or off. The `window` field is
    /// private, so callers outside this module set knobs through methods like this one rather
    /// than functional record update.
    pub fn with_autogrouping(mut self, autogrouping: bool) -> Self {
        self.autogrouping = autogrouping;
        self
    }

    /// Applies the configured display snapping to `value`.
    pub fn snap(&self, value: f64) -> f64 {
        if !self.rounding {
            return value;
        }
        let snapped = norm::snap_near_integer(value, self.accuracy);
        if snapped != value || !self.extended_accurate {
            snapped
        } else {
            norm::round_to_places(value, self.accuracy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_window_validation() {
        assert_eq!(Config::new(2).unwrap().window(), 2);
        assert_eq!(Config::new(0), Err(NormError::InvalidConfiguration(0)));
        assert_eq!(Config::new(-1), Err(NormError::InvalidConfiguration(-1)));
    }

    #[test]
    fn test_with_autogrouping() {
        assert!(Config::default().autogrouping);
        let cfg = Config::new(2).unwrap().with_autogrouping(false);
        assert!(!cfg.autogrouping);
        // The rest of the configuration is untouched.
        assert_eq!(cfg.window(), 2);
        assert!(cfg.rounding);
    }

    #[test]
    fn test_snap_knobs() {
        let cfg = Config::default();
        assert_eq!(cfg.snap(9.000000000000002), 9.0);
        assert_eq!(cfg.snap(9.2), 9.2);

        let off = Config {
            rounding: false,
            ..Config::default()
        };
        assert_eq!(off.snap(9.000000000000002), 9.000000000000002);

        let extended = Config {
            extended_accurate: true,
            accuracy: 3,
            ..Config::default()
        };
        assert_eq!(extended.snap(9.0001), 9.0);
        assert_eq!(extended.snap(9.24568), 9.246);
    }
}
