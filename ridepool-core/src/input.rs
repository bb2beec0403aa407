//! Lenient parsing of client-submitted fields.
//!
//! Clients send numbers either as JSON numbers or as form strings (`"3"`). Blank,
//! non-numeric and zero values mean "use the default"; values that can never be
//! valid are rejected.

use serde_json::Value;

use crate::{CoreError, CoreResult};

/// Numeric reading of a JSON value: numbers as-is, strings parsed after trimming
/// (blank counts as zero). Anything else, or NaN, has no numeric reading.
pub fn lenient_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().ok()?
            }
        }
        _ => return None,
    };
    if n.is_nan() {
        None
    } else {
        Some(n)
    }
}

/// A seat count. `Ok(None)` means the caller should fall back to its default.
///
/// Counts beyond `u32::MAX` saturate; no trip can hold that many, so a reservation
/// for them fails as sold out.
pub fn seat_count(value: Option<&Value>) -> CoreResult<Option<u32>> {
    let Some(n) = lenient_number(value) else {
        return Ok(None);
    };
    if n == 0.0 {
        return Ok(None);
    }
    if n < 0.0 || n.fract() != 0.0 {
        return Err(CoreError::ValidationError(
            "Seats must be a positive whole number".to_string(),
        ));
    }
    Ok(Some(saturating_u32(n)))
}

/// Whole-number conversion that clamps into `0..=u32::MAX`.
pub fn saturating_u32(n: f64) -> u32 {
    if n.is_nan() || n <= 0.0 {
        0
    } else if n >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        n.trunc() as u32
    }
}

/// A price. `Ok(None)` means the caller should fall back to its default.
pub fn price_amount(value: Option<&Value>) -> CoreResult<Option<f64>> {
    let Some(n) = lenient_number(value) else {
        return Ok(None);
    };
    if n == 0.0 {
        return Ok(None);
    }
    if n < 0.0 || n.is_infinite() {
        return Err(CoreError::ValidationError(
            "Price must not be negative".to_string(),
        ));
    }
    Ok(Some(n))
}

/// Trimmed text, or `None` when absent or blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
