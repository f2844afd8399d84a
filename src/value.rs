use log::debug;

use crate::{
    BitPattern, DecomposedValue, Error, FormatSpec, Result, compose, extract,
};

/// What an out-of-range input resolves to, with the text a caller should
/// show in place of the raw input.
#[derive(Debug, Clone, PartialEq)]
pub struct OverflowResolution {
    pub value: f64,
    pub display_text: String,
}

/// An input value after range and representability checks.
///
/// `display_text` is set only when the input overflowed; when the input was
/// merely not representable, `value` holds the nearest representable value.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInput {
    pub value: f64,
    pub display_text: Option<String>,
}

/// One row of [`value_table`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueEntry {
    pub bits: BitPattern,
    pub decomposed: DecomposedValue,
    pub value: f64,
}

const MAX_TABLE_BITS: u32 = 16;

// ───────────────────────────── Bits to value ────────────────────────────────

/// Decodes `bits` to the nearest `f64`, which is exact for every layout whose
/// range and precision fit in binary64.
///
/// Precedence: NaN, infinity, zero and subnormals, normals. Signed zero is
/// preserved. In a layout without zero the all-zero encoding is `±2^-bias`.
pub fn bits_to_value(spec: &FormatSpec, bits: BitPattern) -> f64 {
    if spec.is_nan(bits) {
        return f64::NAN;
    }
    let d = extract(spec, bits);
    let negative = d.sign == 1;
    if spec.is_infinity(bits) {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let bias = i64::from(spec.exponent_bias());
    let m = i64::from(spec.mantissa_bits());
    let magnitude = if d.exponent != 0 {
        let fraction = 1.0 + ldexp(d.significand as f64, -m);
        ldexp(fraction, i64::from(d.exponent) - bias)
    } else if d.significand != 0 {
        ldexp(d.significand as f64, 1 - bias - m)
    } else if spec.has_zero() {
        0.0
    } else {
        ldexp(1.0, -bias)
    };
    if negative { -magnitude } else { magnitude }
}

// ───────────────────────────── Value to bits ────────────────────────────────

/// Encodes `x` as the nearest pattern, rounding to nearest with ties upward.
///
/// NaN becomes the canonical NaN (or 0 when the layout has none), and so does
/// any negative input to an unsigned layout. Values beyond the finite range
/// become infinity when supported and otherwise saturate at the largest
/// finite magnitude. Rounding never lands on a NaN pattern: such a result
/// moves down to the next finite magnitude.
pub fn value_to_bits(spec: &FormatSpec, x: f64) -> BitPattern {
    let max_exponent = spec.max_exponent();
    if x.is_nan() {
        return canonical_nan(spec);
    }
    if !spec.is_signed() && x < 0.0 {
        debug!("{}: {x} is negative in an unsigned layout", spec.name());
        return canonical_nan(spec);
    }

    let sign = u8::from(x.is_sign_negative());
    if x.is_infinite() {
        return saturate(spec, sign);
    }
    if x == 0.0 {
        return compose(spec, &DecomposedValue::new(sign, 0, 0));
    }

    let magnitude = x.abs();
    if magnitude < spec.smallest_positive() {
        return skip_nan_patterns(spec, encode_below_normal(spec, sign, magnitude));
    }

    let mut exponent = floor_log2(magnitude);
    let fraction = ldexp(magnitude, -exponent);
    let mut mantissa =
        round_half_up(ldexp(fraction - 1.0, i64::from(spec.mantissa_bits())));
    if mantissa > spec.max_significand() {
        // Rounded up to 2^m: carry into the exponent.
        mantissa = 0;
        exponent += 1;
    }

    let biased = exponent + i64::from(spec.exponent_bias());
    let top = i64::from(max_exponent);
    if biased >= top {
        if biased == top && !spec.has_infinity() {
            let candidate = compose(
                spec,
                &DecomposedValue::new(sign, max_exponent, mantissa),
            );
            if candidate & !spec.sign_mask() <= spec.max_finite_code() {
                return skip_nan_patterns(spec, candidate);
            }
        }
        debug!("{}: {x} overflows the finite range", spec.name());
        return saturate(spec, sign);
    }
    if biased <= 0 {
        return skip_nan_patterns(spec, encode_below_normal(spec, sign, magnitude));
    }
    // 0 < biased < max_exponent, so it fits the field.
    let bits = compose(spec, &DecomposedValue::new(sign, biased as u32, mantissa));
    skip_nan_patterns(spec, bits)
}

/// All significand bits set under the top exponent, or 0 without NaN.
fn canonical_nan(spec: &FormatSpec) -> BitPattern {
    if !spec.has_nan() {
        return 0;
    }
    let nan = DecomposedValue::new(0, spec.max_exponent(), spec.max_significand());
    compose(spec, &nan)
}

/// Moves a rounded pattern that landed on an explicit NaN pattern down to the
/// next finite magnitude of the same sign.
fn skip_nan_patterns(spec: &FormatSpec, bits: BitPattern) -> BitPattern {
    if spec.nan_patterns().is_empty() || !spec.is_nan(bits) {
        return bits;
    }
    let sign = bits & spec.sign_mask();
    spec.finite_at_or_below(bits & !sign, sign)
        .map_or(bits, |code| sign | code)
}

/// Infinity with the given sign, or the largest finite magnitude.
fn saturate(spec: &FormatSpec, sign: u8) -> BitPattern {
    if spec.has_infinity() {
        return compose(spec, &DecomposedValue::new(sign, spec.max_exponent(), 0));
    }
    let sign_bit = if sign == 1 { spec.sign_mask() } else { 0 };
    sign_bit | spec.max_finite_code()
}

/// Encodes a magnitude below the smallest normal.
fn encode_below_normal(spec: &FormatSpec, sign: u8, magnitude: f64) -> BitPattern {
    let bias = i64::from(spec.exponent_bias());
    if !spec.has_zero() {
        // No subnormal ladder: choose between 2^-bias (the zero encoding) and
        // the smallest normal 2^(1-bias).
        let exponent = u32::from(magnitude >= ldexp(1.5, -bias));
        return compose(spec, &DecomposedValue::new(sign, exponent, 0));
    }
    let m = i64::from(spec.mantissa_bits());
    let significand = round_half_up(ldexp(magnitude, bias + m - 1));
    let d = if significand > spec.max_significand() {
        DecomposedValue::new(sign, 1, 0)
    } else {
        DecomposedValue::new(sign, 0, significand)
    };
    compose(spec, &d)
}

// ──────────────────────────── Range handling ────────────────────────────────

/// True when a finite `value` lies outside `[min_value, max_value]` on its
/// side of zero.
pub fn check_overflow(spec: &FormatSpec, value: f64) -> bool {
    value.is_finite()
        && (value > spec.max_value()
            || (value < 0.0 && value < spec.min_value()))
}

/// Resolves an overflowing value to signed infinity, NaN, or the clamped
/// extremum, in that order of preference.
pub fn handle_overflow(spec: &FormatSpec, value: f64) -> OverflowResolution {
    if !value.is_finite() {
        return OverflowResolution { value, display_text: display_number(value) };
    }
    let resolved = if spec.has_infinity() {
        if value < 0.0 { f64::NEG_INFINITY } else { f64::INFINITY }
    } else if spec.has_nan() {
        f64::NAN
    } else if value < 0.0 {
        spec.min_value()
    } else {
        spec.max_value()
    };
    let display_text = display_number(resolved);
    debug!("{}: {value} is out of range, using {display_text}", spec.name());
    OverflowResolution { value: resolved, display_text }
}

/// Checks `value` against the layout and returns what should be shown so the
/// displayed value agrees with the bits it encodes to.
pub fn normalize_input_value(spec: &FormatSpec, value: f64) -> NormalizedInput {
    if !value.is_finite() {
        return NormalizedInput { value, display_text: None };
    }
    if check_overflow(spec, value) {
        let resolution = handle_overflow(spec, value);
        return NormalizedInput {
            value: resolution.value,
            display_text: Some(resolution.display_text),
        };
    }
    let actual = bits_to_value(spec, value_to_bits(spec, value));
    if (value - actual).abs() > f64::EPSILON {
        NormalizedInput { value: actual, display_text: None }
    } else {
        NormalizedInput { value, display_text: None }
    }
}

/// Every pattern of a layout of at most 16 bits, with its fields and value.
pub fn value_table(spec: &FormatSpec) -> Result<Vec<ValueEntry>> {
    if spec.total_bits() > MAX_TABLE_BITS {
        return Err(Error::TooManyPatterns { total_bits: spec.total_bits() });
    }
    Ok((0..=spec.width_mask())
        .map(|bits| ValueEntry {
            bits,
            decomposed: extract(spec, bits),
            value: bits_to_value(spec, bits),
        })
        .collect())
}

// ────────────────────────────── Display text ────────────────────────────────

/// Plain decimal unless that takes more than 20 digits, then exponential.
pub fn format_finite_with_20_digit_rule(num: f64) -> String {
    let exponential = format!("{num:e}");
    let plain = expand_exponential_to_plain(&exponential);
    let digit_count = plain.chars().filter(char::is_ascii_digit).count();
    if digit_count > 20 { exponential } else { plain }
}

/// Rewrites `d.ddde±x` as a plain decimal. Anything that does not parse is
/// returned unchanged.
pub fn expand_exponential_to_plain(exponential: &str) -> String {
    let Some((mantissa, exponent)) = exponential.split_once(['e', 'E']) else {
        return exponential.to_string();
    };
    let Ok(exponent) = exponent.parse::<i64>() else {
        return exponential.to_string();
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
        return exponential.to_string();
    }

    let digits = format!("{int_part}{frac_part}");
    let point = int_part.len() as i64 + exponent;
    if point <= 0 {
        let body = if digits.bytes().all(|b| b == b'0') { "0" } else { &digits };
        format!("{sign}0.{}{body}", "0".repeat(point.unsigned_abs() as usize))
    } else if point as usize >= digits.len() {
        format!("{sign}{digits}{}", "0".repeat(point as usize - digits.len()))
    } else {
        let (left, right) = digits.split_at(point as usize);
        format!("{sign}{left}.{right}")
    }
}

fn display_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value < 0.0 { "-Infinity" } else { "Infinity" };
        text.to_string()
    } else {
        format_finite_with_20_digit_rule(value)
    }
}

// ──────────────────────────────── Internals ─────────────────────────────────

/// `x × 2^exp` without overflowing intermediate powers of two.
pub(crate) fn ldexp(mut x: f64, mut exp: i64) -> f64 {
    const STEP: i64 = 1000;
    while exp > STEP && x.is_finite() {
        x *= pow2(STEP);
        exp -= STEP;
    }
    while exp < -STEP && x != 0.0 {
        x *= pow2(-STEP);
        exp += STEP;
    }
    if exp > STEP || exp < -STEP {
        // x already saturated to infinity or zero.
        return x;
    }
    x * pow2(exp)
}

/// `2^exp` for `|exp| <= 1000`, always a normal binary64.
fn pow2(exp: i64) -> f64 {
    f64::from_bits(((exp + 1023) as u64) << 52)
}

/// Exact `floor(log2(x))` for finite positive `x`, read off the binary64
/// encoding.
fn floor_log2(x: f64) -> i64 {
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7FF) as i64;
    if biased == 0 {
        let fraction = bits & 0x000F_FFFF_FFFF_FFFF;
        63 - i64::from(fraction.leading_zeros()) - 1074
    } else {
        biased - 1023
    }
}

/// Rounds a non-negative value to the nearest integer, ties upward.
fn round_half_up(x: f64) -> u128 {
    x.round() as u128
}
