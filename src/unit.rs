//! The symbolic unit algebra: a unit is a product of base-unit symbols raised to exponents, kept
//! as an exponent map. Multiplication adds exponents, division subtracts them, and entries that
//! reach zero are pruned immediately, so the empty unit is the multiplicative identity.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::ops::{Div, Mul, Neg};

use num_traits::{Inv, One, Pow};

use crate::markup::{fmt_power, superscript, RenderMode};

/// The exponent of a single symbol. Integer in every table entry and almost every unit in
/// practice, but scalar powers may be fractional (`(m²/s²)^0.5`), so the algebra works in `f64`.
pub type Power = f64;

/// An immutable product of base-unit symbols with nonzero exponents.
///
/// Two units are equal iff their exponent maps are equal: `kg * m / s ** 2` and `N` are unequal
/// until grouping or ungrouping makes their maps match. Every operation returns a new `Unit`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unit {
    powers: BTreeMap<String, Power>,
}

/// Constructs a [`Unit`] from keyword-style symbol/exponent pairs:
/// `unit!(kg: 1, m: 1, s: -2)`. `unit!()` is the empty (dimensionless) unit.
#[macro_export]
macro_rules! unit {
    () => { $crate::unit::Unit::empty() };
    ($($sym:ident : $pow:expr),+ $(,)?) => {
        $crate::unit::Unit::from_symbols([$((stringify!($sym), $pow as $crate::unit::Power)),+])
    };
}

impl Unit {
    /// The dimensionless unit.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a unit from symbol/exponent pairs. Duplicate symbols accumulate; zero exponents are
    /// pruned.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = (S, Power)>,
        S: Into<String>,
    {
        let mut powers: BTreeMap<String, Power> = BTreeMap::new();
        for (symbol, power) in symbols {
            *powers.entry(symbol.into()).or_insert(0.0) += power;
        }
        Self { powers }.pruned()
    }

    fn pruned(mut self) -> Self {
        self.powers.retain(|_, power| *power != 0.0);
        self
    }

    /// The exponent of `symbol`, 0 if absent.
    pub fn power(&self, symbol: &str) -> Power {
        self.powers.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.powers.contains_key(symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.powers.len()
    }

    /// Iterates over symbol/exponent pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Power)> + '_ {
        self.powers.iter().map(|(symbol, &power)| (symbol.as_str(), power))
    }

    /// Entries in canonical display order: exponent descending, symbol ascending as tiebreak.
    pub fn entries(&self) -> Vec<(&str, Power)> {
        let mut entries: Vec<(&str, Power)> = self.iter().collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        entries
    }

    fn combined(&self, other: &Unit, add: bool) -> Unit {
        let mut powers = self.powers.clone();
        for (symbol, &power) in &other.powers {
            *powers.entry(symbol.clone()).or_insert(0.0) += if add { power } else { -power };
        }
        Unit { powers }.pruned()
    }

    /// Scales every exponent by `scalar`. `pow(u, 0)` is the empty unit.
    pub fn pow(&self, scalar: Power) -> Unit {
        Unit {
            powers: self
                .powers
                .iter()
                .map(|(symbol, &power)| (symbol.clone(), power * scalar))
                .collect(),
        }
        .pruned()
    }

    /// Renders the unit. A single symbol with a negative exponent renders as `s ** -2`; otherwise
    /// the first symbol is bare (or `** exp` when the exponent isn't 1) and each later symbol is
    /// prefixed with `*` or `/` according to its sign, with the exponent's absolute value.
    pub fn render(&self, mode: RenderMode) -> String {
        let entries = self.entries();
        match mode {
            RenderMode::Ascii => {
                if let [(symbol, power)] = entries[..] {
                    if power < 0.0 {
                        return format!("{symbol} ** {}", fmt_power(power));
                    }
                }
                let mut out = String::new();
                for (i, (symbol, power)) in entries.iter().enumerate() {
                    if i == 0 {
                        out.push_str(symbol);
                        if *power != 1.0 {
                            out.push_str(&format!(" ** {}", fmt_power(*power)));
                        }
                    } else {
                        out.push_str(if *power > 0.0 { " * " } else { " / " });
                        out.push_str(symbol);
                        if power.abs() != 1.0 {
                            out.push_str(&format!(" ** {}", fmt_power(power.abs())));
                        }
                    }
                }
                out
            }
            RenderMode::Unicode => entries
                .iter()
                .map(|(symbol, power)| {
                    if *power == 1.0 {
                        symbol.to_string()
                    } else {
                        format!("{symbol}{}", superscript(&fmt_power(*power)))
                    }
                })
                .collect::<Vec<_>>()
                .join("\u{00b7}"),
        }
    }
}

impl Mul for Unit {
    type Output = Unit;

    fn mul(self, rhs: Unit) -> Unit {
        self.combined(&rhs, true)
    }
}

impl Mul for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        self.combined(rhs, true)
    }
}

impl Div for Unit {
    type Output = Unit;

    fn div(self, rhs: Unit) -> Unit {
        self.combined(&rhs, false)
    }
}

impl Div for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        self.combined(rhs, false)
    }
}

impl Neg for Unit {
    type Output = Unit;

    /// "One over" the unit: every exponent sign-flipped.
    fn neg(self) -> Unit {
        Unit {
            powers: self
                .powers
                .into_iter()
                .map(|(symbol, power)| (symbol, -power))
                .collect(),
        }
    }
}

impl Inv for Unit {
    type Output = Unit;

    fn inv(self) -> Unit {
        -self
    }
}

impl One for Unit {
    fn one() -> Self {
        Self::empty()
    }

    fn is_one(&self) -> bool {
        self.is_empty()
    }
}

// On &Unit rather than Unit: a by-value impl would be picked over the inherent `pow` during
// method resolution and move the receiver out from under callers that still need it.
impl Pow<Power> for &Unit {
    type Output = Unit;

    fn pow(self, rhs: Power) -> Unit {
        Unit::pow(self, rhs)
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(RenderMode::Ascii))
    }
}
