//! Numeric reading of cells the way the browser grid reads them.
//!
//! The page evaluates style rules with `parseFloat` / `parseInt` on the cell
//! value, so a leading number wins (`"2 pcs"` is 2) and only the exact token
//! `Infinity` is infinite (`"inf"` is not a number).

use crate::types::CellValue;

const INFINITY: &str = "Infinity";

/// `parseFloat(value)`; `None` where the browser gets `NaN`
pub fn coerce_float(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if n.is_nan() => None,
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => parse_float_prefix(s),
        CellValue::Date(_) => parse_float_prefix(&cell.as_text()),
        CellValue::Empty => None,
    }
}

/// `parseInt(value)`; `None` where the browser gets `NaN`
pub fn coerce_int(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if !n.is_finite() => None,
        // Numbers are stringified first; large and tiny ones use exponent form
        CellValue::Number(n) if *n == 0.0 || (1e-6..1e21).contains(&n.abs()) => Some(n.trunc()),
        CellValue::Number(n) => parse_int_prefix(&format!("{:e}", n)),
        CellValue::Text(s) => parse_int_prefix(s),
        CellValue::Date(_) => parse_int_prefix(&cell.as_text()),
        CellValue::Empty => None,
    }
}

fn trim_js_start(s: &str) -> &str {
    s.trim_start_matches(|c: char| (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}')
}

fn split_sign(s: &str) -> (f64, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    }
}

fn digit_run(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Longest leading decimal literal of `s`
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let (sign, body) = split_sign(trim_js_start(s));
    if body.starts_with(INFINITY) {
        return Some(sign * f64::INFINITY);
    }

    let bytes = body.as_bytes();
    let int_digits = digit_run(bytes, 0);
    let mut end = int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digit_run(bytes, end + 1);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digit_run(bytes, exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    body[..end].parse::<f64>().ok().map(|n| sign * n)
}

/// Leading integer of `s`, decimal or `0x` hexadecimal
pub fn parse_int_prefix(s: &str) -> Option<f64> {
    let (sign, body) = split_sign(trim_js_start(s));
    let (radix, digits) = match body.get(..2) {
        Some("0x" | "0X") => (16, &body[2..]),
        _ => (10, body),
    };

    let mut value = 0.0_f64;
    let mut seen = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            break;
        };
        value = value * f64::from(radix) + f64::from(d);
        seen = true;
    }
    seen.then_some(sign * value)
}
