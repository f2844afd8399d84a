//! Symbolic renderings of how a pattern decomposes.
//!
//! The strings use a small markup understood by the display layer: `^` opens
//! a superscript (parenthesized when longer than one token) and `_2` marks a
//! base‑2 literal.

use crate::{DecomposedValue, FormatSpec, compose, extract, value::ldexp};

/// What every equation form collapses to for NaN and infinity.
pub const SPECIAL_EQUATION: &str = "Special (NaN/∞)";

/// Below this power of two, subnormals are shown as a fraction of the
/// subnormal scale rather than an integer multiple of the smallest step.
const MIN_INTEGER_FORM_EXPONENT: i64 = -20;
/// Integer multipliers at or above this are shown as fractions instead.
const MAX_INTEGER_MULTIPLIER: u128 = 1_000_000_000_000_000;
/// A fraction `1 / 2^k` with `k` at most this folds into the exponent.
const MAX_FOLDED_FRACTION_BITS: u32 = 4;

/// `(-1)^s × 10_2^(E_2 - Bias_2) × 1.fraction_2`, with the subnormal exponent
/// written as the literal `1` and a `0.` lead, and `(-1)^s × 0` for zero.
pub fn build_base2_equation(spec: &FormatSpec, d: &DecomposedValue) -> String {
    let bits = compose(spec, d);
    if spec.is_special(bits) {
        return SPECIAL_EQUATION.to_string();
    }
    let d = extract(spec, bits);
    let width = spec.exponent_bits() as usize;
    let sign = format!("(-1)^{}", d.sign);
    let bias = format!("{:0width$b}", spec.exponent_bias());

    if spec.is_zero(bits) {
        return format!("{sign} × 0");
    }
    if d.exponent == 0 && d.significand != 0 {
        let significand = binary_significand(0, d.significand, spec.mantissa_bits());
        return format!("{sign} × 10_2^(1 - {bias}_2) × {significand}");
    }
    let exponent = format!("{:0width$b}", d.exponent);
    let significand = binary_significand(1, d.significand, spec.mantissa_bits());
    format!("{sign} × 10_2^({exponent}_2 - {bias}_2) × {significand}")
}

/// `±1 × 2^e × multiplier` with the true (unbiased) exponent.
///
/// Normals print the significand as a decimal in `[1, 2)`. Subnormals fold
/// trailing zero bits of the significand into the power of two and drop a
/// multiplier of exactly 1.
pub fn build_base10_equation(spec: &FormatSpec, d: &DecomposedValue) -> String {
    let bits = compose(spec, d);
    if spec.is_special(bits) {
        return SPECIAL_EQUATION.to_string();
    }
    let d = extract(spec, bits);
    let sign = if d.sign == 1 { "-1" } else { "1" };
    let bias = i64::from(spec.exponent_bias());
    let m = spec.mantissa_bits();

    if d.exponent == 0 {
        if d.significand == 0 && !spec.has_zero() {
            return format!("{sign} × 2^{}", -bias);
        }
        return subnormal_base10(sign, d.significand, 1 - bias, m);
    }

    let exponent = i64::from(d.exponent) - bias;
    // Only a layout without mantissa bits drops the multiplier. Otherwise the
    // decimal significand stays visible, `× 1` included.
    if m == 0 {
        return format!("{sign} × 2^{exponent}");
    }
    let significand = 1.0 + ldexp(d.significand as f64, -i64::from(m));
    format!("{sign} × 2^{exponent} × {significand}")
}

/// `significand × 2^(scale - m)`, where `scale` is `1 - bias`.
fn subnormal_base10(sign: &str, significand: u128, scale: i64, m: u32) -> String {
    let step = scale - i64::from(m);
    if significand == 0 {
        let exponent = if step > MIN_INTEGER_FORM_EXPONENT { step } else { scale };
        return format!("{sign} × 2^{exponent} × 0");
    }

    let shift = significand.trailing_zeros().min(m);
    let reduced = significand >> shift;
    let folded = step + i64::from(shift);
    if folded > MIN_INTEGER_FORM_EXPONENT && reduced < MAX_INTEGER_MULTIPLIER {
        if reduced == 1 {
            return format!("{sign} × 2^{folded}");
        }
        return format!("{sign} × 2^{folded} × {reduced}");
    }

    let remaining = m - shift;
    if reduced == 1 && remaining <= MAX_FOLDED_FRACTION_BITS {
        return format!("{sign} × 2^{}", scale - i64::from(remaining));
    }
    let fraction = ldexp(reduced as f64, -i64::from(remaining));
    format!("{sign} × 2^{scale} × {fraction}")
}

fn binary_significand(lead: u8, significand: u128, width: u32) -> String {
    if width == 0 {
        return format!("{lead}_2");
    }
    format!("{lead}.{significand:0width$b}_2", width = width as usize)
}
