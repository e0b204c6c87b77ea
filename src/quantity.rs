//! Quantity values: a normalized mantissa, a decimal exponent, and a symbolic unit, with
//! dimensionally-checked arithmetic on top. Every constructed value is flattened to its raw
//! magnitude and re-normalized (ungroup, one grouping pass, window reduction), so arithmetic can
//! combine mantissas and exponents naively and still hand back canonical values.

use std::cmp::Ordering;
use std::fmt::Display;
use std::ops::{Add, Div, Mul, Neg, Sub};

use approx::AbsDiffEq;
use num_traits::Pow;
use thiserror::Error;

use crate::config::Config;
use crate::derived;
use crate::markup::RenderMode;
use crate::norm;
use crate::unit::Unit;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QuantityError {
    #[error("unit mismatch in operation: `{0}` does not match `{1}`")]
    UnitMismatch(Unit, Unit),
    #[error("the exponent for raising a quantity must be a bare number, got unit `{0}`")]
    InvalidExponent(Unit),
}

/// A physical quantity `mantissa * 10^exponent` scaled by a symbolic unit.
///
/// Immutable: every operation returns a fresh, fully-normalized value. After normalization the
/// mantissa satisfies `|mantissa| < 10^window`; there is no lower bound, so `0.0001` keeps
/// exponent 0.
///
/// Equality is exact triple equality of mantissa, exponent, and unit map. There is no semantic
/// ("same physical magnitude") equality: since every public construction normalizes, values that
/// agree in raw magnitude and unit compare equal anyway, but `N` never equals `kg * m / s ** 2`.
///
/// The configuration a quantity was built under rides along: arithmetic results inherit it (the
/// left operand's, for binary operations), so a window-2 or grouping-off quantity stays that way
/// through a computation. It takes no part in equality.
#[derive(Debug, Clone)]
pub struct Quantity {
    mantissa: f64,
    exponent: i32,
    unit: Unit,
    config: Config,
}

impl Quantity {
    /// Constructs a quantity from `value * 10^exponent` and normalizes it under the default
    /// [`Config`]. An exponent of 0 means "let normalization find the split".
    pub fn new(value: f64, exponent: i32, unit: Unit) -> Self {
        Self::new_in(value, exponent, unit, &Config::default())
    }

    /// [`Quantity::new`] with an explicit configuration.
    pub fn new_in(value: f64, exponent: i32, unit: Unit, config: &Config) -> Self {
        Self::build(value * 10f64.powi(exponent), unit, config)
    }

    /// The normalization step every value passes through: ungroup the unit to SI base symbols,
    /// try one grouping pass (when autogrouping is on), then reduce the raw magnitude to the
    /// mantissa window.
    fn build(raw: f64, unit: Unit, config: &Config) -> Self {
        let unit = if config.autogrouping {
            derived::group(&derived::ungroup(&unit))
        } else {
            unit
        };
        Self::reduced(raw, unit, config)
    }

    /// Window reduction without the grouping pass, for callers that have already settled the
    /// unit ([`Quantity::ungroup`] must not re-group what it just expanded).
    fn reduced(raw: f64, unit: Unit, config: &Config) -> Self {
        let (mantissa, exponent) = norm::reduce(raw, config.window());
        Self {
            mantissa,
            exponent,
            unit,
            config: config.clone(),
        }
    }

    pub fn mantissa(&self) -> f64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// The configuration this quantity was built under.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The flattened magnitude, `mantissa * 10^exponent`.
    pub fn raw_value(&self) -> f64 {
        self.mantissa * 10f64.powi(self.exponent)
    }

    fn check_units(&self, other: &Quantity) -> Result<(), QuantityError> {
        if self.unit != other.unit {
            return Err(QuantityError::UnitMismatch(
                self.unit.clone(),
                other.unit.clone(),
            ));
        }
        Ok(())
    }

    /// Adds two quantities, failing unless their units are exactly equal (dimensional
    /// equivalence is not enough: group or ungroup first). The sum is normalized under `self`'s
    /// configuration.
    pub fn try_add(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        self.check_units(other)?;
        Ok(Self::build(
            self.raw_value() + other.raw_value(),
            self.unit.clone(),
            &self.config,
        ))
    }

    /// Subtracts `other`, with the same exact-unit requirement as [`Quantity::try_add`].
    pub fn try_sub(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        self.check_units(other)?;
        Ok(Self::build(
            self.raw_value() - other.raw_value(),
            self.unit.clone(),
            &self.config,
        ))
    }

    /// Raises the quantity to a plain real power: the mantissa is exponentiated, the decimal
    /// exponent and every unit exponent scale by `exponent`. Negative mantissas with fractional
    /// exponents follow `f64::powf` (NaN); no special-casing.
    pub fn powf(&self, exponent: f64) -> Quantity {
        let raw = self.mantissa.powf(exponent) * 10f64.powf(self.exponent as f64 * exponent);
        Self::build(raw, self.unit.pow(exponent), &self.config)
    }

    /// Raises the quantity to another quantity's value, which must be a bare number: any unit on
    /// the exponent operand fails with [`QuantityError::InvalidExponent`].
    pub fn try_pow(&self, exponent: &Quantity) -> Result<Quantity, QuantityError> {
        if !exponent.unit.is_empty() {
            return Err(QuantityError::InvalidExponent(exponent.unit.clone()));
        }
        Ok(self.powf(exponent.raw_value()))
    }

    /// Compares raw magnitudes, failing on mismatched units. NaN magnitudes fall back to the
    /// IEEE total order.
    pub fn try_cmp(&self, other: &Quantity) -> Result<Ordering, QuantityError> {
        self.check_units(other)?;
        Ok(self.raw_value().total_cmp(&other.raw_value()))
    }

    /// Expands every derived symbol in the unit to SI base units, re-normalizing the mantissa
    /// without re-grouping. The result keeps `self`'s configuration.
    pub fn ungroup(&self) -> Quantity {
        Self::reduced(self.raw_value(), derived::ungroup(&self.unit), &self.config)
    }

    /// Applies one more grouping pass to the unit. Grouping is single-shot, so callers wanting a
    /// fixpoint re-invoke until the unit stops changing.
    pub fn group(&self) -> Quantity {
        Self::reduced(self.raw_value(), derived::group(&self.unit), &self.config)
    }

    /// Rounds the raw magnitude to `digits` decimal places and re-normalizes.
    pub fn round_to(&self, digits: i32) -> Quantity {
        Self::build(
            norm::round_to_places(self.raw_value(), digits),
            self.unit.clone(),
            &self.config,
        )
    }

    /// Renders under this quantity's own configuration. ASCII is what `Display` shows.
    pub fn render(&self, mode: RenderMode) -> String {
        self.render_in(mode, &self.config)
    }

    /// Renders the snapped mantissa, the power-of-ten suffix when the exponent is nonzero, and
    /// the unit when it is non-empty.
    pub fn render_in(&self, mode: RenderMode, config: &Config) -> String {
        let mut out = config.snap(self.mantissa).to_string();
        if self.exponent != 0 {
            out.push_str(&mode.times_ten(self.exponent));
        }
        if !self.unit.is_empty() {
            out.push(' ');
            out.push_str(&self.unit.render(mode));
        }
        out
    }
}

impl Add for Quantity {
    type Output = Quantity;

    /// Panics on mismatched units; use [`Quantity::try_add`] to handle the error.
    fn add(self, rhs: Quantity) -> Quantity {
        match self.try_add(&rhs) {
            Ok(sum) => sum,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    /// Panics on mismatched units; use [`Quantity::try_sub`] to handle the error.
    fn sub(self, rhs: Quantity) -> Quantity {
        match self.try_sub(&rhs) {
            Ok(difference) => difference,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Mul for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: Quantity) -> Quantity {
        Quantity::build(
            (self.mantissa * rhs.mantissa) * 10f64.powi(self.exponent + rhs.exponent),
            self.unit * rhs.unit,
            &self.config,
        )
    }
}

impl Div for Quantity {
    type Output = Quantity;

    fn div(self, rhs: Quantity) -> Quantity {
        Quantity::build(
            (self.mantissa / rhs.mantissa) * 10f64.powi(self.exponent - rhs.exponent),
            self.unit / rhs.unit,
            &self.config,
        )
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    /// Scalar multiplication scales the mantissa only.
    fn mul(self, rhs: f64) -> Quantity {
        Quantity::build(
            (self.mantissa * rhs) * 10f64.powi(self.exponent),
            self.unit,
            &self.config,
        )
    }
}

impl Mul<Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: Quantity) -> Quantity {
        rhs * self
    }
}

impl Div<f64> for Quantity {
    type Output = Quantity;

    fn div(self, rhs: f64) -> Quantity {
        Quantity::build(
            (self.mantissa / rhs) * 10f64.powi(self.exponent),
            self.unit,
            &self.config,
        )
    }
}

impl Div<Quantity> for f64 {
    type Output = Quantity;

    /// Divides the scalar by the mantissa, keeping the exponent and the (un-inverted) unit.
    fn div(self, rhs: Quantity) -> Quantity {
        Quantity::build(
            (self / rhs.mantissa) * 10f64.powi(rhs.exponent),
            rhs.unit,
            &rhs.config,
        )
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity::build(-self.raw_value(), self.unit, &self.config)
    }
}

impl Pow<f64> for Quantity {
    type Output = Quantity;

    fn pow(self, rhs: f64) -> Quantity {
        self.powf(rhs)
    }
}

// Triple equality only: the carried configuration is construction metadata, not part of the
// value.
impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.mantissa == other.mantissa
            && self.exponent == other.exponent
            && self.unit == other.unit
    }
}

impl PartialOrd for Quantity {
    /// `None` on mismatched units. Note the asymmetry with `+` and `-`: a comparison operator
    /// like `<` quietly evaluates to `false` on a unit mismatch where addition would panic.
    /// [`Quantity::try_cmp`] reports the mismatch as an error instead.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.unit != other.unit {
            return None;
        }
        self.raw_value().partial_cmp(&other.raw_value())
    }
}

impl AbsDiffEq for Quantity {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    /// Same unit, raw magnitudes within `epsilon`.
    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.unit == other.unit && self.raw_value().abs_diff_eq(&other.raw_value(), epsilon)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(RenderMode::Ascii))
    }
}
