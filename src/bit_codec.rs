use crate::{BitPattern, Error, FormatSpec, Result};

/// The three fields of a bit pattern, right-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DecomposedValue {
    /// 0 or 1. Always 0 for layouts without a sign bit.
    pub sign: u8,
    /// Raw (biased) exponent field.
    pub exponent: u32,
    /// Fraction field, without the implicit leading bit.
    pub significand: u128,
}

impl DecomposedValue {
    pub fn new(sign: u8, exponent: u32, significand: u128) -> Self {
        Self { sign, exponent, significand }
    }
}

/// Unchecked field values as edited by a caller, possibly out of range for
/// any layout. See [`clamp_decomposed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldEdit {
    pub sign: i64,
    pub exponent: i64,
    pub significand: i128,
}

impl From<DecomposedValue> for FieldEdit {
    fn from(d: DecomposedValue) -> Self {
        Self {
            sign: i64::from(d.sign),
            exponent: i64::from(d.exponent),
            significand: i128::try_from(d.significand).unwrap_or(i128::MAX),
        }
    }
}

// ─────────────────────────── Decompose / compose ────────────────────────────

/// Splits `bits` into sign, exponent and significand. Every pattern of the
/// layout's width decomposes unambiguously.
pub fn extract(spec: &FormatSpec, bits: BitPattern) -> DecomposedValue {
    DecomposedValue {
        sign: spec.extract_sign(bits),
        exponent: spec.extract_exponent(bits),
        significand: spec.extract_mantissa(bits),
    }
}

/// Reassembles a bit pattern. The sign is reduced mod 2, the exponent is
/// clamped to the field range and the significand is masked to the field
/// width, silently dropping high bits.
pub fn compose(spec: &FormatSpec, d: &DecomposedValue) -> BitPattern {
    let sign = if spec.is_signed() {
        BitPattern::from(d.sign % 2) << (spec.total_bits() - 1)
    } else {
        0
    };
    let exponent = BitPattern::from(d.exponent.min(spec.max_exponent()));
    let significand = d.significand & spec.mantissa_mask();
    sign | (exponent << spec.mantissa_bits()) | significand
}

/// Brings arbitrary field values into range: a positive sign becomes 1, any
/// other sign 0; exponent and significand saturate at their field bounds.
pub fn clamp_decomposed(spec: &FormatSpec, edit: &FieldEdit) -> DecomposedValue {
    let sign = u8::from(spec.is_signed() && edit.sign > 0);
    let exponent = edit.exponent.clamp(0, i64::from(spec.max_exponent()));
    let significand = if edit.significand <= 0 {
        0
    } else {
        // Positive, so the conversion to u128 is exact.
        (edit.significand as u128).min(spec.max_significand())
    };
    DecomposedValue {
        sign,
        // Bounded by max_exponent, which is a u32.
        exponent: exponent as u32,
        significand,
    }
}

// ──────────────────────────── Raw renderings ────────────────────────────────

/// The bits of `bits`, most significant first, `total_bits` long.
pub fn bits_to_array(spec: &FormatSpec, bits: BitPattern) -> Vec<u8> {
    (0..spec.total_bits())
        .rev()
        .map(|i| ((bits >> i) & 1) as u8)
        .collect()
}

/// `0x` followed by `⌈total_bits/4⌉` zero-padded lowercase hex digits.
pub fn bits_to_raw_hex(spec: &FormatSpec, bits: BitPattern) -> String {
    let digits = spec.total_bits().div_ceil(4) as usize;
    let encoded = hex::encode((bits & spec.width_mask()).to_be_bytes());
    format!("0x{}", &encoded[encoded.len() - digits..])
}

/// The pattern as an unsigned decimal integer.
pub fn bits_to_raw_decimal(bits: BitPattern) -> String {
    bits.to_string()
}

/// C99 `%a`-style rendering: `[-]0x1.<hex>p<exp>` for normals,
/// `[-]0x0.<hex>p<1-bias>` for zeros and subnormals, `nan`, `inf`, `-inf`
/// for special values. The exponent is printed without a `+`.
pub fn bits_to_hex_float(spec: &FormatSpec, bits: BitPattern) -> String {
    if spec.is_nan(bits) {
        return "nan".to_string();
    }
    let d = extract(spec, bits);
    let sign = if d.sign == 1 { "-" } else { "" };
    if spec.is_infinity(bits) {
        return format!("{sign}inf");
    }
    let bias = i64::from(spec.exponent_bias());
    let fraction = hex_fraction(spec.mantissa_bits(), d.significand);
    if d.exponent == 0 && (d.significand != 0 || spec.has_zero()) {
        format!("{sign}0x0.{fraction}p{}", 1 - bias)
    } else {
        format!("{sign}0x1.{fraction}p{}", i64::from(d.exponent) - bias)
    }
}

/// Left-aligns the fraction to whole hex digits and trims trailing zeros.
fn hex_fraction(mantissa_bits: u32, significand: u128) -> String {
    let digits = mantissa_bits.div_ceil(4);
    let aligned = significand << (digits * 4 - mantissa_bits);
    let padded = format!("{aligned:0width$x}", width = digits as usize);
    let trimmed = padded.trim_end_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

// ─────────────────────────────── Bytes ──────────────────────────────────────

/// Reads a pattern from `⌈total_bits/8⌉` big‑endian bytes. Bits above
/// `total_bits` must be clear.
pub fn bits_from_be_bytes(
    spec: &FormatSpec,
    bytes: impl AsRef<[u8]>,
) -> Result<BitPattern> {
    let b = bytes.as_ref();
    let expected = byte_len(spec);
    if b.len() != expected {
        return Err(Error::InvalidLength { expected, actual: b.len() });
    }
    let mut buf = [0u8; 16];
    buf[16 - expected..].copy_from_slice(b);
    let bits = BitPattern::from_be_bytes(buf);
    if bits & !spec.width_mask() != 0 {
        return Err(Error::PatternTooWide { total_bits: spec.total_bits() });
    }
    Ok(bits)
}

/// Writes a pattern as `⌈total_bits/8⌉` big‑endian bytes.
pub fn bits_to_be_bytes(spec: &FormatSpec, bits: BitPattern) -> Vec<u8> {
    let bytes = (bits & spec.width_mask()).to_be_bytes();
    bytes[bytes.len() - byte_len(spec)..].to_vec()
}

fn byte_len(spec: &FormatSpec) -> usize {
    spec.total_bits().div_ceil(8) as usize
}
