//! An exact codec for parametric binary floating-point layouts.
//!
//! A [`FormatSpec`] describes a layout by its total width, exponent and
//! mantissa widths, exponent bias, and which special values it carries:
//! infinity, NaN (by the IEEE rule or by explicit bit patterns), and zero.
//! One struct covers IEEE‑754 binary16/32/64, bfloat16, and the OCP
//! microscaling formats (E4M3, E5M2, E8M0, E2M3, E3M2, E2M1).
//!
//! Given a raw bit pattern the crate
//! - splits it into sign, exponent and significand and recomposes it,
//! - converts it to and from `f64` with round-to-nearest, ties upward,
//! - renders its exact decimal value with arbitrary-precision integers,
//! - renders base‑2 and base‑10 equations describing the decomposition.
//!
//! All functions are pure; specs are immutable and freely shared.

mod error;
pub use error::*;
mod format_spec;
pub use format_spec::*;
mod registry;
pub use registry::*;
mod bit_codec;
pub use bit_codec::*;
mod value;
pub use value::*;
mod exact_decimal;
pub use exact_decimal::*;
mod equation;
pub use equation::*;
