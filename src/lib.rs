//! Unit-safe physical quantities in normalized scientific notation: a quantity is a mantissa
//! confined to a configurable base-10 window, a decimal exponent, and a symbolic unit. Arithmetic
//! is dimensionally checked (adding meters to seconds is an error), and normalization recognizes
//! derived units automatically, so `5 kg * 25 m/s²` comes back as `1.25 * 10 ** 2 N`.

pub mod config;
pub mod derived;
pub mod markup;
pub mod norm;
pub mod quantity;
pub mod unit;

pub use config::Config;
pub use markup::RenderMode;
pub use quantity::{Quantity, QuantityError};
pub use unit::Unit;
