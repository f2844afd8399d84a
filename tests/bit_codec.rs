use hex_literal::hex;
use minifloat_codec::{
    DecomposedValue, Error, FieldEdit, FormatKey, bits_from_be_bytes, bits_to_array,
    bits_to_be_bytes, bits_to_hex_float, bits_to_raw_decimal, bits_to_raw_hex,
    bits_to_value, clamp_decomposed, compose, extract,
};

#[test]
fn e4m3_nan_decomposition() {
    // NaN: sign=0, exp=1111, mant=111 = 0x7F
    let spec = FormatKey::E4M3.spec();
    let d = extract(spec, 0x7F);
    assert_eq!(d, DecomposedValue::new(0, 15, 7));
    assert_eq!(compose(spec, &d), 0x7F);
    assert_eq!(bits_to_array(spec, 0x7F), [0, 1, 1, 1, 1, 1, 1, 1]);
    assert_eq!(bits_to_array(spec, 0xFF), [1, 1, 1, 1, 1, 1, 1, 1]);
    assert_eq!(bits_to_raw_hex(spec, 0x7F), "0x7f");
    assert_eq!(bits_to_raw_decimal(0x7F), "127");
}

#[test]
fn e4m3_negative_zero_decomposition() {
    let spec = FormatKey::E4M3.spec();
    let d = extract(spec, 0x80);
    assert_eq!(d, DecomposedValue::new(1, 0, 0));
    assert_eq!(compose(spec, &d), 0x80);
    assert_eq!(bits_to_raw_hex(spec, 0x00), "0x00");
    assert_eq!(bits_to_array(spec, 0x08), [0, 0, 0, 0, 1, 0, 0, 0]);
}

#[test]
fn e5m2_infinity_decomposition() {
    // +Infinity: sign=0, exp=11111, mant=00 = 0x7C
    let spec = FormatKey::E5M2.spec();
    let d = extract(spec, 0x7C);
    assert_eq!(d.exponent, 31);
    assert_eq!(d.significand, 0);
    assert_eq!(compose(spec, &d), 0x7C);
    assert_eq!(bits_to_array(spec, 0xFC), [1, 1, 1, 1, 1, 1, 0, 0]);
}

#[test]
fn compose_reduces_clamps_and_masks() {
    let spec = FormatKey::E5M2.spec();
    // Sign mod 2, exponent clamped to 31, significand masked to 2 bits.
    assert_eq!(compose(spec, &DecomposedValue::new(3, 999, 0b111)), 0xFF);
    assert_eq!(compose(spec, &DecomposedValue::new(2, 1, 0b100)), 0x04);

    // Without a sign bit the sign never leaks into the exponent.
    let e8m0 = FormatKey::E8M0.spec();
    assert_eq!(compose(e8m0, &DecomposedValue::new(1, 0x7F, 0)), 0x7F);
}

#[test]
fn clamp_decomposed_e5m2() {
    let spec = FormatKey::E5M2.spec();
    let edit = FieldEdit { sign: 15, exponent: 999, significand: 25 };
    assert_eq!(clamp_decomposed(spec, &edit), DecomposedValue::new(1, 31, 3));
}

#[test]
fn clamp_decomposed_e4m3() {
    let spec = FormatKey::E4M3.spec();
    let edit = FieldEdit { sign: 15, exponent: 999, significand: 25 };
    assert_eq!(clamp_decomposed(spec, &edit), DecomposedValue::new(1, 15, 7));
}

#[test]
fn clamp_decomposed_negative_fields() {
    let spec = FormatKey::E2M3.spec();
    let edit = FieldEdit { sign: -1, exponent: -5, significand: -9 };
    assert_eq!(clamp_decomposed(spec, &edit), DecomposedValue::default());

    // Unsigned layouts have nowhere to put a sign.
    let e8m0 = FormatKey::E8M0.spec();
    let edit = FieldEdit { sign: 1, exponent: 300, significand: 5 };
    assert_eq!(clamp_decomposed(e8m0, &edit), DecomposedValue::new(0, 255, 0));
}

#[test]
fn carry_fields_across_format_switch() {
    // Double's 1.5 carried into E4M3: exponent 1023 saturates at 15, the
    // 52-bit significand saturates at 7.
    let double = FormatKey::Double.spec();
    let carried = FieldEdit::from(extract(double, 0x3FF8_0000_0000_0000));
    let e4m3 = FormatKey::E4M3.spec();
    let d = clamp_decomposed(e4m3, &carried);
    assert_eq!(d, DecomposedValue::new(0, 15, 7));
    assert!(bits_to_value(e4m3, compose(e4m3, &d)).is_nan());
}

#[test]
fn raw_hex_width_follows_total_bits() {
    assert_eq!(bits_to_raw_hex(FormatKey::E2M1.spec(), 0x5), "0x5");
    assert_eq!(bits_to_raw_hex(FormatKey::E2M3.spec(), 0x07), "0x07");
    assert_eq!(bits_to_raw_hex(FormatKey::Bfloat.spec(), 0x0001), "0x0001");
    assert_eq!(
        bits_to_raw_hex(FormatKey::Double.spec(), 0x3FF0_0000_0000_0000),
        "0x3ff0000000000000"
    );
}

#[test]
fn bit_array_length_follows_total_bits() {
    assert_eq!(bits_to_array(FormatKey::E2M3.spec(), 0x07), [0, 0, 0, 1, 1, 1]);
    let bf16 = bits_to_array(FormatKey::Bfloat.spec(), 0x0001);
    assert_eq!(bf16.len(), 16);
    assert_eq!(bf16[15], 1);
    assert!(bf16[..15].iter().all(|&b| b == 0));
}

#[test]
fn hex_float_specials() {
    let e4m3 = FormatKey::E4M3.spec();
    assert_eq!(bits_to_hex_float(e4m3, 0x7F), "nan");
    assert_eq!(bits_to_hex_float(e4m3, 0xFF), "nan");

    let e5m2 = FormatKey::E5M2.spec();
    assert_eq!(bits_to_hex_float(e5m2, 0x7C), "inf");
    assert_eq!(bits_to_hex_float(e5m2, 0xFC), "-inf");
    assert_eq!(bits_to_hex_float(e5m2, 0x7D), "nan");
}

#[test]
fn hex_float_finite() {
    let e4m3 = FormatKey::E4M3.spec();
    // 448 = 0x1.cp8 sits in the top exponent, which E4M3 does not reserve.
    assert_eq!(bits_to_hex_float(e4m3, 0x7E), "0x1.cp8");
    assert_eq!(bits_to_hex_float(e4m3, 0xFE), "-0x1.cp8");
    assert_eq!(bits_to_hex_float(e4m3, 0x08), "0x1.0p-6");
    assert_eq!(bits_to_hex_float(e4m3, 0x07), "0x0.ep-6");
    assert_eq!(bits_to_hex_float(e4m3, 0x00), "0x0.0p-6");
    assert_eq!(bits_to_hex_float(e4m3, 0x80), "-0x0.0p-6");

    let half = FormatKey::Half.spec();
    assert_eq!(bits_to_hex_float(half, 0x3555), "0x1.554p-2");

    let double = FormatKey::Double.spec();
    assert_eq!(bits_to_hex_float(double, 0x3FF0_0000_0000_0000), "0x1.0p0");
    assert_eq!(bits_to_hex_float(double, 0x4008_0000_0000_0000), "0x1.8p1");

    let e8m0 = FormatKey::E8M0.spec();
    assert_eq!(bits_to_hex_float(e8m0, 0x00), "0x1.0p-127");
    assert_eq!(bits_to_hex_float(e8m0, 0x7F), "0x1.0p0");
}

#[test]
fn be_bytes_roundtrip() {
    let half = FormatKey::Half.spec();
    let bits = bits_from_be_bytes(half, hex!("3c00")).unwrap();
    assert_eq!(bits, 0x3C00);
    assert_eq!(bits_to_value(half, bits), 1.0);
    assert_eq!(bits_to_be_bytes(half, bits), hex!("3c00"));

    let double = FormatKey::Double.spec();
    let bits = bits_from_be_bytes(double, hex!("400921fb54442d18")).unwrap();
    assert_eq!(bits_to_value(double, bits), std::f64::consts::PI);
    assert_eq!(bits_to_be_bytes(double, bits), hex!("400921fb54442d18"));

    // Six bits travel in one byte.
    let e2m3 = FormatKey::E2M3.spec();
    assert_eq!(bits_from_be_bytes(e2m3, hex!("1f")).unwrap(), 0x1F);
}

#[test]
fn be_bytes_rejects_wrong_length() {
    let half = FormatKey::Half.spec();
    let err = bits_from_be_bytes(half, hex!("3c")).unwrap_err();
    assert!(matches!(err, Error::InvalidLength { expected: 2, actual: 1 }));
    assert_eq!(
        err.to_string(),
        "invalid pattern length: expected 2 bytes, got 1 bytes"
    );
}

#[test]
fn be_bytes_rejects_bits_above_width() {
    let e2m3 = FormatKey::E2M3.spec();
    let err = bits_from_be_bytes(e2m3, hex!("40")).unwrap_err();
    assert!(matches!(err, Error::PatternTooWide { total_bits: 6 }));
}
