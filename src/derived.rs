//! The derived-unit table and the grouping/ungrouping passes that consult it. Grouping collapses
//! a recognizable base-unit combination into a named derived symbol (`kg * m / s ** 2` → `N`);
//! ungrouping expands a derived symbol back to its SI base-unit decomposition. Both return new
//! units and never touch their input.

use phf::phf_map;

use crate::unit::{Power, Unit};

/// A named derived unit: the base-symbol patterns it can replace, and the SI decomposition used
/// to expand it again.
pub struct DerivedUnit {
    /// Patterns tried by the grouping pass, in order. Each is a base-symbol/exponent map that is
    /// replaceable by the derived symbol when present with a consistent sign ratio.
    pub patterns: &'static [&'static [(&'static str, i32)]],
    /// The SI base-unit decomposition.
    pub si: &'static [(&'static str, i32)],
}

/// Every derived symbol known to the crate, read-only for the process lifetime.
pub static DERIVED_UNITS: phf::Map<&'static str, DerivedUnit> = phf_map! {
    "N" => DerivedUnit {
        patterns: &[&[("kg", 1), ("m", 1), ("s", -2)]],
        si: &[("kg", 1), ("m", 1), ("s", -2)],
    },
    "Pa" => DerivedUnit {
        patterns: &[&[("kg", 1), ("m", -1), ("s", -2)]],
        si: &[("kg", 1), ("m", -1), ("s", -2)],
    },
    "J" => DerivedUnit {
        patterns: &[&[("kg", 1), ("m", 2), ("s", -2)]],
        si: &[("kg", 1), ("m", 2), ("s", -2)],
    },
    "W" => DerivedUnit {
        patterns: &[&[("kg", 1), ("m", 2), ("s", -3)]],
        si: &[("kg", 1), ("m", 2), ("s", -3)],
    },
    "C" => DerivedUnit {
        patterns: &[&[("s", 1), ("A", 1)]],
        si: &[("s", 1), ("A", 1)],
    },
    "V" => DerivedUnit {
        patterns: &[&[("kg", 1), ("m", 2), ("s", -3), ("A", -1)]],
        si: &[("kg", 1), ("m", 2), ("s", -3), ("A", -1)],
    },
};

/// Scan order for the grouping pass. The order is semantically significant: the min-ratio match
/// rule lets a larger pattern claim `kg * m / s ** 2` with a fractional multiplier, so `N` must
/// come before the patterns it is a divisor of. `phf` iteration order is unspecified, which is
/// why this is pinned separately.
pub static GROUPING_ORDER: &[&str] = &["N", "Pa", "J", "W", "C", "V"];

/// Expands every recognized derived symbol in `unit` to its SI base units.
///
/// Only the sign of the derived symbol's exponent propagates, not its magnitude: `N ** 2`
/// expands the same way `N` does. Observed behavior of the system this reimplements; do not
/// "fix" it to multiply by the full exponent.
pub fn ungroup(unit: &Unit) -> Unit {
    let mut symbols: Vec<(&str, Power)> = Vec::with_capacity(unit.len());
    for (symbol, power) in unit.iter() {
        match DERIVED_UNITS.get(symbol) {
            Some(entry) => {
                let sign = power.signum();
                for &(base, decomposition) in entry.si {
                    symbols.push((base, decomposition as Power * sign));
                }
            }
            None => symbols.push((symbol, power)),
        }
    }
    Unit::from_symbols(symbols)
}

/// Attempts one grouping pass: the first pattern across the whole table that matches `unit` is
/// applied and the result returned. Not iterated to a fixpoint; callers wanting full grouping
/// re-invoke until the unit stops changing.
pub fn group(unit: &Unit) -> Unit {
    for &name in GROUPING_ORDER {
        let Some(entry) = DERIVED_UNITS.get(name) else {
            continue;
        };
        for pattern in entry.patterns {
            if let Some(grouped) = apply_pattern(unit, name, pattern) {
                return grouped;
            }
        }
    }
    unit.clone()
}

/// Replaces `multiplier` copies of `pattern` inside `unit` by `name`, if the pattern matches.
///
/// A pattern matches when every one of its symbols is present and all unit/pattern exponent
/// ratios share a sign. The multiplier is the smallest absolute ratio (fractional multipliers
/// are allowed), and the shared sign comes from the first pattern symbol.
fn apply_pattern(unit: &Unit, name: &str, pattern: &[(&str, i32)]) -> Option<Unit> {
    let mut ratios = Vec::with_capacity(pattern.len());
    for &(symbol, pattern_power) in pattern {
        if !unit.contains(symbol) {
            return None;
        }
        ratios.push(unit.power(symbol) / pattern_power as Power);
    }

    let sign = ratios[0].signum();
    if ratios.iter().any(|ratio| ratio.signum() != sign) {
        return None;
    }
    let multiplier = ratios.iter().fold(f64::INFINITY, |min, r| min.min(r.abs()));
    if multiplier <= 0.0 {
        return None;
    }

    let mut symbols: Vec<(String, Power)> = unit
        .iter()
        .map(|(symbol, power)| (symbol.to_string(), power))
        .collect();
    for &(symbol, pattern_power) in pattern {
        symbols.push((symbol.to_string(), -(pattern_power as Power) * multiplier * sign));
    }
    symbols.push((name.to_string(), multiplier * sign));
    Some(Unit::from_symbols(symbols))
}
