use num_bigint::{BigInt, BigUint};

use minifloat_codec::{
    DecomposedValue, FormatKey, FormatSpec, extract, fraction_to_decimal,
    get_exact_base10_value,
};

fn exact(spec: &FormatSpec, bits: u128) -> String {
    get_exact_base10_value(spec, &extract(spec, bits))
}

#[test]
fn e4m3_exact_values() {
    let spec = FormatKey::E4M3.spec();
    assert_eq!(exact(spec, 0x7F), "NaN");
    assert_eq!(exact(spec, 0xFF), "NaN");
    assert_eq!(exact(spec, 0x00), "0");
    assert_eq!(exact(spec, 0x80), "-0");
    assert_eq!(exact(spec, 0x7E), "448");
    assert_eq!(exact(spec, 0xFE), "-448");
    assert_eq!(exact(spec, 0x38), "1");
    assert_eq!(exact(spec, 0x08), "0.015625");
    assert_eq!(exact(spec, 0x07), "0.013671875");
    assert_eq!(exact(spec, 0x01), "0.001953125");
}

#[test]
fn e5m2_exact_values() {
    let spec = FormatKey::E5M2.spec();
    assert_eq!(exact(spec, 0x7C), "Infinity");
    assert_eq!(exact(spec, 0xFC), "-Infinity");
    assert_eq!(exact(spec, 0x7D), "NaN");
    assert_eq!(exact(spec, 0x7B), "5.7344×10^4");
    assert_eq!(exact(spec, 0xFB), "-5.7344×10^4");
    assert_eq!(exact(spec, 0x04), "6.103515625×10^-5");
    assert_eq!(exact(spec, 0x03), "4.57763671875×10^-5");
    assert_eq!(exact(spec, 0x01), "1.52587890625×10^-5");
}

#[test]
fn e2m3_exact_values() {
    let spec = FormatKey::E2M3.spec();
    assert_eq!(exact(spec, 0x1F), "7.5");
    assert_eq!(exact(spec, 0x08), "1");
    assert_eq!(exact(spec, 0x28), "-1");
    assert_eq!(exact(spec, 0x07), "0.875");
    assert_eq!(exact(spec, 0x01), "0.125");
}

#[test]
fn bfloat_min_subnormal_is_exact() {
    let spec = FormatKey::Bfloat.spec();
    assert_eq!(
        exact(spec, 0x0001),
        "9.18354961579912115600575419704879435795832466228193376178712270530013483949005603790283203125×10^-41"
    );
}

#[test]
fn e8m0_extremes_are_exact() {
    let spec = FormatKey::E8M0.spec();
    assert_eq!(
        exact(spec, 0x00),
        "5.8774717541114375398436826861112283890933277838604376075437585313920862972736358642578125×10^-39"
    );
    assert_eq!(exact(spec, 0x7F), "1");
    assert_eq!(exact(spec, 0xFE), "1.70141183460469231731687303715884105728×10^38");
    assert_eq!(exact(spec, 0xFF), "NaN");
}

#[test]
fn half_and_double_exact_values() {
    assert_eq!(exact(FormatKey::Half.spec(), 0x7BFF), "6.5504×10^4");
    assert_eq!(exact(FormatKey::Half.spec(), 0x3C00), "1");

    let double = FormatKey::Double.spec();
    assert_eq!(
        exact(double, u128::from(0.1f64.to_bits())),
        "0.1000000000000000055511151231257827021181583404541015625"
    );
}

#[test]
fn long_expansions_are_truncated() {
    // 2^-1074 has more fractional digits than the expansion keeps.
    let text = exact(FormatKey::Double.spec(), 0x1);
    assert!(text.starts_with("4.9406564584124654"), "{text}");
    assert!(text.ends_with("×10^-324"), "{text}");
}

#[test]
fn out_of_range_fields_are_reduced_first() {
    let spec = FormatKey::E4M3.spec();
    let d = DecomposedValue::new(0, 99, 6);
    assert_eq!(get_exact_base10_value(spec, &d), "448");
}

#[test]
fn repeating_fractions() {
    let frac = |n: i64, d: u64| fraction_to_decimal(&BigInt::from(n), &BigUint::from(d));
    assert_eq!(frac(1, 3), "0.(3)");
    assert_eq!(frac(1, 6), "0.1(6)");
    assert_eq!(frac(-1, 7), "-0.(142857)");
    assert_eq!(frac(22, 7), "3.(142857)");
}

#[test]
fn terminating_fractions() {
    let frac = |n: i64, d: u64| fraction_to_decimal(&BigInt::from(n), &BigUint::from(d));
    assert_eq!(frac(1, 4), "0.25");
    assert_eq!(frac(-3, 8), "-0.375");
    assert_eq!(frac(10, 5), "2");
    assert_eq!(frac(0, 9), "0");
    assert_eq!(frac(5, 0), "Infinity");
}
