//! Lenient numeric parsing for product fields.
//!
//! Clients send `price` and `stock` either as JSON numbers or as strings typed
//! into a form. Strings are read by their longest numeric prefix after leading
//! whitespace, so `"199.5"` and `"199.5 USD"` both give 199.5 and `"abc"`
//! gives nothing.

use serde::Deserialize;

/// A numeric field as it arrived on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
    /// Anything else (booleans, arrays, objects); never parses.
    Other(serde_json::Value),
}

impl NumericInput {
    /// True for input that counts as "not supplied" for a required field.
    pub fn is_blank(&self) -> bool {
        match self {
            NumericInput::Text(s) => s.trim().is_empty(),
            NumericInput::Number(_) => false,
            NumericInput::Other(v) => v.is_null() || v == &serde_json::Value::Bool(false),
        }
    }

    /// Read as a decimal. `None` when nothing numeric could be read.
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            NumericInput::Number(n) => n.is_finite().then_some(*n),
            NumericInput::Text(s) => parse_leading_float(s),
            NumericInput::Other(_) => None,
        }
    }

    /// Read as an integer, truncating any fractional part toward zero.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            NumericInput::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            NumericInput::Number(_) => None,
            NumericInput::Text(s) => parse_leading_int(s),
            NumericInput::Other(_) => None,
        }
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

/// Parse the longest leading integer (`[+-]?digits`) after leading whitespace.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    s[..end].parse::<i64>().ok()
}

/// Parse the longest leading decimal (`[+-]?digits[.digits][e[+-]digits]`,
/// with either side of the dot optional but not both) after leading whitespace.
pub fn parse_leading_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while is_digit(end) {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while is_digit(frac_end) {
            frac_end += 1;
        }
        let frac_digits = frac_end - frac_start;
        if mantissa_digits + frac_digits > 0 {
            end = frac_end;
            mantissa_digits += frac_digits;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while is_digit(exp_end) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
