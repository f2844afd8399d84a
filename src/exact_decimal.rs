use std::collections::HashMap;

use log::warn;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::{DecomposedValue, FormatSpec, compose, extract};

/// Safety bound on fractional digits produced by long division.
pub const MAX_FRACTION_DIGITS: usize = 1000;

/// The exact base‑10 value of a decomposed pattern, with no intermediate
/// rounding.
///
/// Every finite value is `± numerator / 2^k`, expanded by long division.
/// Orders of magnitude in `[-3, 3]` print as plain decimals (`448`,
/// `0.015625`); others as `d.ddd×10^e`. Specials print as `NaN`, `Infinity`
/// or `-Infinity`; zero as `0` or `-0`.
pub fn get_exact_base10_value(spec: &FormatSpec, d: &DecomposedValue) -> String {
    let bits = compose(spec, d);
    let d = extract(spec, bits);
    let negative = d.sign == 1;
    if spec.is_nan(bits) {
        return "NaN".to_string();
    }
    if spec.is_infinity(bits) {
        let text = if negative { "-Infinity" } else { "Infinity" };
        return text.to_string();
    }
    if spec.is_zero(bits) {
        let text = if negative { "-0" } else { "0" };
        return text.to_string();
    }

    let bias = i64::from(spec.exponent_bias());
    let m = spec.mantissa_bits();
    let (numerator, exp2) = if d.exponent == 0 && d.significand != 0 {
        // Subnormal: significand / 2^(m + bias - 1).
        (BigUint::from(d.significand), 1 - bias - i64::from(m))
    } else {
        // Normal, including the zero encoding of a zero-less layout, whose
        // exponent field 0 is read as a normal exponent:
        // (2^m + significand) × 2^(exponent - bias - m).
        let full = (BigUint::one() << m) + d.significand;
        (full, i64::from(d.exponent) - bias - i64::from(m))
    };

    let (numerator, denominator) = if exp2 >= 0 {
        (numerator << exp2.unsigned_abs(), BigUint::one())
    } else {
        (numerator, BigUint::one() << exp2.unsigned_abs())
    };
    let expansion = long_division(&numerator, &denominator);
    if expansion.repeat_from.is_some() {
        return format!("{}{}", sign_prefix(negative), expansion);
    }
    format_magnitude(negative, &expansion.whole, &expansion.fraction)
}

/// Long division of `numerator / denominator` as a decimal string. A cycle in
/// the remainders is written with the repeating digits in parentheses
/// (`1/3` → `0.(3)`, `1/6` → `0.1(6)`). Expansion stops after
/// [`MAX_FRACTION_DIGITS`] digits even without a cycle.
pub fn fraction_to_decimal(numerator: &BigInt, denominator: &BigUint) -> String {
    if denominator.is_zero() {
        return "Infinity".to_string();
    }
    if numerator.is_zero() {
        return "0".to_string();
    }
    let negative = numerator.sign() == Sign::Minus;
    let expansion = long_division(numerator.magnitude(), denominator);
    format!("{}{}", sign_prefix(negative), expansion)
}

// ────────────────────────────── Internals ───────────────────────────────────

struct Expansion {
    whole: BigUint,
    fraction: String,
    repeat_from: Option<usize>,
}

impl std::fmt::Display for Expansion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.fraction.is_empty() {
            return write!(f, "{}", self.whole);
        }
        match self.repeat_from {
            Some(start) => {
                let (fixed, repeating) = self.fraction.split_at(start);
                write!(f, "{}.{}({})", self.whole, fixed, repeating)
            }
            None => write!(f, "{}.{}", self.whole, self.fraction),
        }
    }
}

fn long_division(numerator: &BigUint, denominator: &BigUint) -> Expansion {
    let ten = BigUint::from(10u32);
    let whole = numerator / denominator;
    let mut remainder = numerator % denominator;
    let mut fraction = String::new();
    let mut seen: HashMap<BigUint, usize> = HashMap::new();

    while !remainder.is_zero() {
        if fraction.len() >= MAX_FRACTION_DIGITS {
            warn!("decimal expansion truncated at {MAX_FRACTION_DIGITS} digits");
            break;
        }
        if let Some(&start) = seen.get(&remainder) {
            return Expansion { whole, fraction, repeat_from: Some(start) };
        }
        seen.insert(remainder.clone(), fraction.len());
        remainder *= &ten;
        let digit = &remainder / denominator;
        remainder %= denominator;
        fraction.push_str(&digit.to_string());
    }
    Expansion { whole, fraction, repeat_from: None }
}

/// Chooses plain or scientific notation from the order of magnitude of the
/// leading digit.
fn format_magnitude(negative: bool, whole: &BigUint, fraction: &str) -> String {
    let sign = sign_prefix(negative);
    let fraction = fraction.trim_end_matches('0');
    let (digits, exponent) = if whole.is_zero() {
        let significant = fraction.trim_start_matches('0');
        if significant.is_empty() {
            return format!("{sign}0");
        }
        let zeros = fraction.len() - significant.len();
        (significant.to_string(), -(zeros as i64) - 1)
    } else {
        let int_part = whole.to_string();
        let exponent = int_part.len() as i64 - 1;
        (format!("{int_part}{fraction}"), exponent)
    };
    // Leading digit is non-zero, so this never empties the string.
    let digits = digits.trim_end_matches('0');

    if (-3..=3).contains(&exponent) {
        if exponent < 0 {
            let zeros = "0".repeat((-exponent - 1) as usize);
            return format!("{sign}0.{zeros}{digits}");
        }
        let point = exponent as usize + 1;
        if point >= digits.len() {
            return format!("{sign}{digits}{}", "0".repeat(point - digits.len()));
        }
        let (int_digits, frac_digits) = digits.split_at(point);
        return format!("{sign}{int_digits}.{frac_digits}");
    }

    let (lead, rest) = digits.split_at(1);
    if rest.is_empty() {
        format!("{sign}{lead}×10^{exponent}")
    } else {
        format!("{sign}{lead}.{rest}×10^{exponent}")
    }
}

fn sign_prefix(negative: bool) -> &'static str {
    if negative { "-" } else { "" }
}
