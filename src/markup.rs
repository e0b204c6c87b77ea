//! Rendering quantities and units for humans. The physics literature writes `7.56 × 10² kg·m·s⁻²`,
//! which mocks up fine in Unicode but is brittle for some user environments, so everything can
//! also render in a plain-ASCII grammar (`7.56 * 10 ** 2 kg * m / s ** 2`). ASCII is the
//! canonical form used by `Display`.

/// An environment in which quantities and units can be displayed.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RenderMode {
    #[default]
    Ascii,
    Unicode,
}

impl RenderMode {
    /// The power-of-ten suffix for a nonzero decimal exponent.
    pub(crate) fn times_ten(&self, exponent: i32) -> String {
        match self {
            RenderMode::Ascii if exponent == 1 => " * 10".to_string(),
            RenderMode::Ascii => format!(" * 10 ** {exponent}"),
            RenderMode::Unicode => format!(" \u{00d7} 10{}", superscript(&exponent.to_string())),
        }
    }
}

/// Formats a unit exponent, dropping the trailing `.0` of integral values.
pub(crate) fn fmt_power(power: f64) -> String {
    if power.fract() == 0.0 && power.abs() < 1e15 {
        format!("{}", power as i64)
    } else {
        format!("{power}")
    }
}

/// Translates digits and signs to their Unicode superscript forms. Characters with no superscript
/// equivalent pass through unchanged.
pub(crate) fn superscript(text: &str) -> String {
    text.chars().map(superscript_char).collect()
}

// The rules for superscripting numbers are a total disaster in Unicode due to reasons: 1-3 live in
// Latin-1, the rest in the superscripts block.
const fn superscript_char(c: char) -> char {
    match c {
        '0' => '\u{2070}',
        '1' => '\u{00b9}',
        '2' => '\u{00b2}',
        '3' => '\u{00b3}',
        '4' => '\u{2074}',
        '5' => '\u{2075}',
        '6' => '\u{2076}',
        '7' => '\u{2077}',
        '8' => '\u{2078}',
        '9' => '\u{2079}',
        '+' => '\u{207a}',
        '-' => '\u{207b}',
        other => other,
    }
}
