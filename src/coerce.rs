//! Lenient parsing of numbers typed by a learner.
//!
//! Editing a field must never fail: the longest numeric prefix is used and
//! anything else (including `NaN`) becomes `0`.

use log::warn;

/// Parses `text` leniently, falling back to `0` when it has no numeric prefix.
///
/// Leading whitespace is skipped and trailing garbage is ignored, so `"3.5kg"`
/// reads as `3.5` and `"abc"` as `0`. `Infinity` (optionally signed) is
/// accepted.
pub fn coerce(text: &str) -> f64 {
    match parse_prefix(text) {
        Some(value) if value.is_nan() || value == 0. => 0.,
        Some(value) => value,
        None => {
            warn!("'{text}' is not a number, using 0");
            0.
        }
    }
}

fn parse_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        let inf = if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Some(inf);
    }

    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let int_digits = digits(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}
