//! Kubernetes resource quantity parsing.
//!
//! Converts quantity strings such as `512Mi`, `1Gi`, `2G` or `1e9` into a
//! byte count, rounding fractional results up the way the API server does.

use std::sync::LazyLock;

use k8s_openapi::api::core::v1::ResourceRequirements;
use thiserror::Error;

/// Bytes in one mebibyte.
pub const MEBIBYTE: i64 = 1 << 20;

/// Error parsing a resource quantity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// String does not match the quantity grammar
    #[error("invalid quantity '{0}'. Expected <number><suffix> where suffix is one of Ki, Mi, Gi, Ti, Pi, Ei, n, u, m, k, M, G, T, P, E or an exponent (e.g. 512Mi, 1e9)")]
    Malformed(String),

    /// Value does not fit in a signed 64-bit byte count
    #[error("quantity '{0}' is out of range")]
    OutOfRange(String),
}

/// Power applied by a quantity suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scale {
    /// Multiply by 2^n
    Binary(u32),
    /// Multiply by 10^n (n may be negative)
    Decimal(i32),
}

/// Parse a quantity into its integer value, rounding up.
///
/// The arithmetic is exact: the mantissa is read as an integer over a power
/// of ten, so decimal values like `2.097151M` land on the exact byte count.
pub fn parse_quantity(quantity: &str) -> Result<i64, QuantityError> {
    // Pattern: ^(sign)(integer)(.fraction)?(binarySI|decimalSI|exponent)?$
    static QUANTITY_RE: LazyLock<Option<regex::Regex>> = LazyLock::new(|| {
        regex::Regex::new(
            r"^([+-]?)(?:([0-9]+)(?:\.([0-9]*))?|\.([0-9]+))(Ki|Mi|Gi|Ti|Pi|Ei|n|u|m|k|M|G|T|P|E|[eE][+-]?[0-9]+)?$",
        )
        .ok()
    });

    let malformed = || QuantityError::Malformed(quantity.to_string());
    let out_of_range = || QuantityError::OutOfRange(quantity.to_string());

    let trimmed = quantity.trim();
    let captures = QUANTITY_RE
        .as_ref()
        .and_then(|re| re.captures(trimmed))
        .ok_or_else(malformed)?;

    let negative = captures.get(1).is_some_and(|m| m.as_str() == "-");
    let integer = captures.get(2).map_or("", |m| m.as_str());
    let fraction = captures
        .get(3)
        .or_else(|| captures.get(4))
        .map_or("", |m| m.as_str());

    let scale = match captures.get(5).map(|m| m.as_str()) {
        None => Scale::Decimal(0),
        Some(suffix) => suffix_scale(suffix).ok_or_else(malformed)?,
    };

    // value = digits / 10^fraction_len, scaled
    let digits = format!("{}{}", integer, fraction);
    let mut numerator: i128 = digits.parse().map_err(|_| out_of_range())?;
    let fraction_len = i32::try_from(fraction.len()).map_err(|_| out_of_range())?;
    let mut decimal_exponent = -fraction_len;

    match scale {
        Scale::Binary(power) => {
            numerator = 2i128
                .checked_pow(power)
                .and_then(|factor| numerator.checked_mul(factor))
                .ok_or_else(out_of_range)?;
        }
        Scale::Decimal(power) => {
            decimal_exponent = decimal_exponent
                .checked_add(power)
                .ok_or_else(out_of_range)?;
        }
    }

    let magnitude = if decimal_exponent >= 0 {
        10i128
            .checked_pow(decimal_exponent.unsigned_abs())
            .and_then(|factor| numerator.checked_mul(factor))
            .ok_or_else(out_of_range)?
    } else {
        match 10i128.checked_pow(decimal_exponent.unsigned_abs()) {
            Some(denominator) => {
                let whole = numerator / denominator;
                // Positive values round up, negative ones toward zero
                if numerator % denominator != 0 && !negative {
                    whole + 1
                } else {
                    whole
                }
            }
            // Denominator beyond i128: any nonzero value is a sliver above zero
            None if numerator != 0 && !negative => 1,
            None => 0,
        }
    };

    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| out_of_range())
}

fn suffix_scale(suffix: &str) -> Option<Scale> {
    let scale = match suffix {
        "Ki" => Scale::Binary(10),
        "Mi" => Scale::Binary(20),
        "Gi" => Scale::Binary(30),
        "Ti" => Scale::Binary(40),
        "Pi" => Scale::Binary(50),
        "Ei" => Scale::Binary(60),
        "n" => Scale::Decimal(-9),
        "u" => Scale::Decimal(-6),
        "m" => Scale::Decimal(-3),
        "k" => Scale::Decimal(3),
        "M" => Scale::Decimal(6),
        "G" => Scale::Decimal(9),
        "T" => Scale::Decimal(12),
        "P" => Scale::Decimal(15),
        "E" => Scale::Decimal(18),
        exponent => Scale::Decimal(exponent.get(1..)?.parse().ok()?),
    };
    Some(scale)
}

/// Memory limit of a container in bytes. A missing limit counts as zero.
pub fn memory_limit_bytes(resources: Option<&ResourceRequirements>) -> Result<i64, QuantityError> {
    let limit = resources
        .and_then(|r| r.limits.as_ref())
        .and_then(|limits| limits.get("memory"));

    match limit {
        Some(quantity) => parse_quantity(&quantity.0),
        None => Ok(0),
    }
}

/// Whole mebibytes in a byte count, rounded down.
pub fn to_mebibytes(bytes: i64) -> i64 {
    bytes.div_euclid(MEBIBYTE)
}
