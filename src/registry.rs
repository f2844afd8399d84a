use std::sync::LazyLock;

use crate::{Error, FormatDef, FormatSpec, Result};

/// The built-in floating-point layouts, addressable by a short string key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKey {
    /// OCP MX FP8 E4M3: no infinity, NaN only at `S.1111.111`.
    E4M3,
    /// OCP MX FP8 E5M2: IEEE-style infinity and NaN.
    E5M2,
    /// OCP MX E8M0 scale: unsigned, exponent only, no zero, NaN at `0xFF`.
    E8M0,
    /// OCP MX FP6 E2M3, no special values.
    E2M3,
    /// OCP MX FP6 E3M2, no special values.
    E3M2,
    /// OCP MX FP4 E2M1, no special values.
    E2M1,
    /// IEEE‑754 binary16
    Half,
    /// bfloat16
    Bfloat,
    /// IEEE‑754 binary32
    Float,
    /// IEEE‑754 binary64
    Double,
}

static REGISTRY: LazyLock<Vec<FormatSpec>> = LazyLock::new(|| {
    FormatKey::ALL
        .iter()
        .map(|key| FormatSpec::derive(key.definition()))
        .collect()
});

impl FormatKey {
    pub const ALL: [FormatKey; 10] = [
        Self::E4M3,
        Self::E5M2,
        Self::E8M0,
        Self::E2M3,
        Self::E3M2,
        Self::E2M1,
        Self::Half,
        Self::Bfloat,
        Self::Float,
        Self::Double,
    ];

    pub fn from_key(key: &str) -> Result<Self> {
        match key {
            "e4m3" => Ok(Self::E4M3),
            "e5m2" => Ok(Self::E5M2),
            "e8m0" => Ok(Self::E8M0),
            "e2m3" => Ok(Self::E2M3),
            "e3m2" => Ok(Self::E3M2),
            "e2m1" => Ok(Self::E2M1),
            "half" => Ok(Self::Half),
            "bfloat" => Ok(Self::Bfloat),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            _ => Err(Error::UnknownFormat(key.to_string())),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::E4M3 => "e4m3",
            Self::E5M2 => "e5m2",
            Self::E8M0 => "e8m0",
            Self::E2M3 => "e2m3",
            Self::E3M2 => "e3m2",
            Self::E2M1 => "e2m1",
            Self::Half => "half",
            Self::Bfloat => "bfloat",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// The declarative layout behind this key.
    pub fn definition(self) -> FormatDef {
        match self {
            Self::E4M3 => {
                FormatDef::new("FP8 (E4M3)", 8, 4, 3, 7).with_nan_patterns(&[0b0_1111_111])
            }
            Self::E5M2 => {
                FormatDef::new("FP8 (E5M2)", 8, 5, 2, 15).with_infinity().with_nan()
            }
            Self::E8M0 => {
                FormatDef::new("E8 (E8M0)", 8, 8, 0, 127).with_nan().without_zero()
            }
            Self::E2M3 => FormatDef::new("FP6 (E2M3)", 6, 2, 3, 1),
            Self::E3M2 => FormatDef::new("FP6 (E3M2)", 6, 3, 2, 3),
            Self::E2M1 => FormatDef::new("FP4 (E2M1)", 4, 2, 1, 1),
            Self::Half => {
                FormatDef::new("half", 16, 5, 10, 15).with_infinity().with_nan()
            }
            Self::Bfloat => {
                FormatDef::new("bfloat", 16, 8, 7, 127).with_infinity().with_nan()
            }
            Self::Float => {
                FormatDef::new("float", 32, 8, 23, 127).with_infinity().with_nan()
            }
            Self::Double => {
                FormatDef::new("double", 64, 11, 52, 1023).with_infinity().with_nan()
            }
        }
    }

    /// The shared, immutable spec for this key.
    pub fn spec(self) -> &'static FormatSpec {
        &REGISTRY[self as usize]
    }
}

/// Looks up a built-in format by its string key.
pub fn format_spec(key: &str) -> Result<&'static FormatSpec> {
    Ok(FormatKey::from_key(key)?.spec())
}
