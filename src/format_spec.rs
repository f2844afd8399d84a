use core::fmt;

use crate::{Error, Result, bits_to_value, value::ldexp};

/// A raw, right-aligned bit pattern of some [`FormatSpec`].
///
/// Wide enough for every layout up to 128 bits (binary128 included) without
/// relying on a native float of that width.
pub type BitPattern = u128;

const MAX_TOTAL_BITS: u32 = 128;
const MAX_EXPONENT_BITS: u32 = 31;

/// Declarative description of a binary floating-point layout, before any
/// validation or derived constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatDef {
    pub name: String,
    pub total_bits: u32,
    pub exponent_bits: u32,
    pub mantissa_bits: u32,
    pub exponent_bias: u32,
    pub has_infinity: bool,
    pub has_nan: bool,
    /// Patterns that denote NaN. A candidate matches when every bit of a
    /// pattern is set in it. Empty selects the IEEE rule: all-ones exponent
    /// and non-zero significand.
    pub nan_patterns: Vec<BitPattern>,
    /// When false, the all-zero encoding stands for `2^-bias` instead of zero.
    pub has_zero: bool,
}

impl FormatDef {
    /// A layout with zero and subnormals, and no infinity or NaN.
    pub fn new(
        name: impl Into<String>,
        total_bits: u32,
        exponent_bits: u32,
        mantissa_bits: u32,
        exponent_bias: u32,
    ) -> Self {
        Self {
            name: name.into(),
            total_bits,
            exponent_bits,
            mantissa_bits,
            exponent_bias,
            has_infinity: false,
            has_nan: false,
            nan_patterns: Vec::new(),
            has_zero: true,
        }
    }

    pub fn with_infinity(mut self) -> Self {
        self.has_infinity = true;
        self
    }

    pub fn with_nan(mut self) -> Self {
        self.has_nan = true;
        self
    }

    /// Enables NaN and restricts it to the given patterns.
    pub fn with_nan_patterns(mut self, patterns: &[BitPattern]) -> Self {
        self.has_nan = true;
        self.nan_patterns = patterns.to_vec();
        self
    }

    pub fn without_zero(mut self) -> Self {
        self.has_zero = false;
        self
    }
}

/// An immutable, validated floating-point layout with its derived masks and
/// range constants.
///
/// Bits are laid out most-significant first as `[sign] exponent mantissa`;
/// the sign bit exists only when the widths leave one spare bit.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSpec {
    def: FormatDef,
    sign_bits: u32,
    sign_mask: BitPattern,
    exponent_mask: BitPattern,
    mantissa_mask: BitPattern,
    max_finite_code: BitPattern,
    min_value: f64,
    max_value: f64,
    smallest_positive: f64,
}

impl TryFrom<FormatDef> for FormatSpec {
    type Error = Error;

    fn try_from(def: FormatDef) -> Result<Self> {
        let invalid = || Error::InvalidLayout {
            total_bits: def.total_bits,
            exponent_bits: def.exponent_bits,
            mantissa_bits: def.mantissa_bits,
        };
        if def.total_bits > MAX_TOTAL_BITS
            || def.exponent_bits == 0
            || def.exponent_bits > MAX_EXPONENT_BITS
        {
            return Err(invalid());
        }
        let spare = def
            .total_bits
            .checked_sub(def.exponent_bits + def.mantissa_bits)
            .ok_or_else(invalid)?;
        if spare > 1 {
            return Err(invalid());
        }
        // NaN patterns that cover every magnitude leave nothing to encode.
        let no_finite_code = invalid();
        let spec = Self::derive(def);
        if spec.largest_finite_code().is_none() {
            return Err(no_finite_code);
        }
        Ok(spec)
    }
}

impl FormatSpec {
    /// Computes every derived constant. The layout must already be valid.
    pub(crate) fn derive(def: FormatDef) -> Self {
        let sign_bits = def.total_bits - def.exponent_bits - def.mantissa_bits;
        let mantissa_mask = low_mask(def.mantissa_bits);
        let exponent_mask = low_mask(def.exponent_bits) << def.mantissa_bits;
        let sign_mask = if sign_bits == 0 {
            0
        } else {
            1 << (def.total_bits - 1)
        };
        let smallest_positive = ldexp(1.0, 1 - i64::from(def.exponent_bias));

        let mut spec = Self {
            def,
            sign_bits,
            sign_mask,
            exponent_mask,
            mantissa_mask,
            max_finite_code: 0,
            min_value: 0.0,
            max_value: 0.0,
            smallest_positive,
        };
        spec.max_finite_code = spec.largest_finite_code().unwrap_or(0);
        spec.max_value = bits_to_value(&spec, spec.max_finite_code);
        spec.min_value = if spec.is_signed() {
            -spec.max_value
        } else {
            spec.smallest_positive
        };
        spec
    }

    fn largest_finite_code(&self) -> Option<BitPattern> {
        let top = self.exponent_mask | self.mantissa_mask;
        if self.has_nan_patterns() {
            // Only the listed patterns are reserved, for either sign.
            return self.finite_at_or_below(top, self.sign_mask);
        }
        if self.def.has_infinity || self.def.has_nan {
            let exponent = BitPattern::from(self.max_exponent() - 1);
            return Some((exponent << self.def.mantissa_bits) | self.mantissa_mask);
        }
        Some(top)
    }

    /// The largest magnitude code at or below `code` that is neither an
    /// explicit NaN pattern nor infinity once `sign` is added back.
    ///
    /// A covering pattern is escaped by clearing its lowest set bit and
    /// filling every bit below it, which is the largest code under `code`
    /// that the pattern no longer covers. Each step lowers `code`.
    pub(crate) fn finite_at_or_below(
        &self,
        mut code: BitPattern,
        sign: BitPattern,
    ) -> Option<BitPattern> {
        let magnitude = self.exponent_mask | self.mantissa_mask;
        loop {
            let covering = self
                .def
                .nan_patterns
                .iter()
                .find(|&&p| self.def.has_nan && (code | sign) & p == p);
            if let Some(&p) = covering {
                let bits = p & magnitude;
                if bits == 0 {
                    return None;
                }
                let lowest = bits & bits.wrapping_neg();
                code = (code & !lowest) | (lowest - 1);
            } else if self.is_infinity(code) {
                code = code.checked_sub(1)?;
            } else {
                return Some(code);
            }
        }
    }

    fn has_nan_patterns(&self) -> bool {
        self.def.has_nan && !self.def.nan_patterns.is_empty()
    }

    // ───────────────────────────── Layout ───────────────────────────────────

    pub fn definition(&self) -> &FormatDef { &self.def }

    pub fn name(&self) -> &str { &self.def.name }

    pub fn total_bits(&self) -> u32 { self.def.total_bits }

    pub fn exponent_bits(&self) -> u32 { self.def.exponent_bits }

    pub fn mantissa_bits(&self) -> u32 { self.def.mantissa_bits }

    pub fn exponent_bias(&self) -> u32 { self.def.exponent_bias }

    /// Number of sign bits: 0 or 1.
    pub fn sign_bits(&self) -> u32 { self.sign_bits }

    pub fn is_signed(&self) -> bool { self.sign_bits == 1 }

    pub fn has_infinity(&self) -> bool { self.def.has_infinity }

    pub fn has_nan(&self) -> bool { self.def.has_nan }

    pub fn has_zero(&self) -> bool { self.def.has_zero }

    pub fn nan_patterns(&self) -> &[BitPattern] { &self.def.nan_patterns }

    pub fn sign_mask(&self) -> BitPattern { self.sign_mask }

    pub fn exponent_mask(&self) -> BitPattern { self.exponent_mask }

    pub fn mantissa_mask(&self) -> BitPattern { self.mantissa_mask }

    /// Mask covering all `total_bits` bits.
    pub fn width_mask(&self) -> BitPattern { low_mask(self.def.total_bits) }

    /// The all-ones exponent field value.
    pub fn max_exponent(&self) -> u32 {
        (1u32 << self.def.exponent_bits) - 1
    }

    /// The all-ones significand field value.
    pub fn max_significand(&self) -> u128 { self.mantissa_mask }

    // ───────────────────────────── Range ────────────────────────────────────

    /// Exponent and significand bits (sign excluded) of the largest finite
    /// magnitude.
    pub fn max_finite_code(&self) -> BitPattern { self.max_finite_code }

    /// Largest finite magnitude.
    pub fn max_value(&self) -> f64 { self.max_value }

    /// `-max_value` for signed layouts, otherwise `smallest_positive`.
    pub fn min_value(&self) -> f64 { self.min_value }

    /// Smallest normal magnitude, `2^(1 - bias)`.
    pub fn smallest_positive(&self) -> f64 { self.smallest_positive }

    // ─────────────────────────── Field access ───────────────────────────────

    pub fn extract_sign(&self, bits: BitPattern) -> u8 {
        u8::from(bits & self.sign_mask != 0)
    }

    pub fn extract_exponent(&self, bits: BitPattern) -> u32 {
        // At most 31 bits wide, so the narrowing is lossless.
        ((bits & self.exponent_mask) >> self.def.mantissa_bits) as u32
    }

    pub fn extract_mantissa(&self, bits: BitPattern) -> u128 {
        bits & self.mantissa_mask
    }

    // ─────────────────────────── Special values ─────────────────────────────

    pub fn is_nan(&self, bits: BitPattern) -> bool {
        if !self.def.has_nan {
            return false;
        }
        if !self.def.nan_patterns.is_empty() {
            return self.def.nan_patterns.iter().any(|&p| bits & p == p);
        }
        self.extract_exponent(bits) == self.max_exponent()
            && (self.def.mantissa_bits == 0 || self.extract_mantissa(bits) != 0)
    }

    pub fn is_infinity(&self, bits: BitPattern) -> bool {
        self.def.has_infinity
            && self.extract_exponent(bits) == self.max_exponent()
            && self.extract_mantissa(bits) == 0
    }

    /// True for NaN and infinity patterns.
    pub fn is_special(&self, bits: BitPattern) -> bool {
        self.is_nan(bits) || self.is_infinity(bits)
    }

    /// True when the exponent and significand are both zero and the layout
    /// gives that encoding the value zero.
    pub fn is_zero(&self, bits: BitPattern) -> bool {
        self.def.has_zero
            && bits & (self.exponent_mask | self.mantissa_mask) == 0
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        write!(
            f,
            "{}[{}]: s{} e{} m{} bias={} inf={} nan={} zero={}",
            self.def.name,
            self.def.total_bits,
            self.sign_bits,
            self.def.exponent_bits,
            self.def.mantissa_bits,
            self.def.exponent_bias,
            yes_no(self.def.has_infinity),
            yes_no(self.def.has_nan),
            yes_no(self.def.has_zero),
        )
    }
}

pub(crate) fn low_mask(bits: u32) -> BitPattern {
    if bits >= BitPattern::BITS {
        BitPattern::MAX
    } else {
        (1 << bits) - 1
    }
}
