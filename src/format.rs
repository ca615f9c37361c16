//! Deterministic rounding and minimal decimal rendering for coordinates.
//!
//! Rounding works on the shortest decimal representation of the value rather
//! than scaling by powers of ten, so `1.005` rounds to `1.01` the way a person
//! reading the number expects.

/// Round half away from zero to `precision` decimal digits.
///
/// NaN and infinities are a caller error; they are returned unchanged.
pub fn round(value: f64, precision: u32) -> f64 {
    debug_assert!(value.is_finite(), "round() called with {value}");

    // `Display` for f64 yields the shortest round-tripping digits and never
    // switches to exponent notation.
    let text = format!("{}", value.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let precision = precision as usize;
    if frac_part.len() <= precision {
        return value;
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(precision))
        .map(|b| b - b'0')
        .collect();
    let mut int_len = int_part.len();

    if frac_part.as_bytes()[precision] >= b'5' {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
            int_len += 1;
        }
    }

    let mut rendered = String::with_capacity(digits.len() + 1);
    for (i, d) in digits.iter().enumerate() {
        if i == int_len {
            rendered.push('.');
        }
        rendered.push(char::from(b'0' + d));
    }

    // A string of ASCII digits with at most one dot always parses.
    let magnitude: f64 = rendered.parse().unwrap_or(value.abs());
    if value.is_sign_negative() { -magnitude } else { magnitude }
}

/// Render a value as the shortest exact fixed-point decimal string.
///
/// Never uses exponent notation, never ends in `.` or trailing zeros, and
/// prints negative zero as `0`.
pub fn to_minimal_decimal_string(value: f64) -> String {
    debug_assert!(value.is_finite(), "to_minimal_decimal_string() called with {value}");

    if value == 0.0 {
        return "0".to_string();
    }
    let s = format!("{}", value);
    if !s.contains('.') {
        return s;
    }
    let s = s.trim_end_matches('0');
    let s = s.trim_end_matches('.');
    s.to_string()
}

/// Round to `precision` digits and render minimally.
pub fn format_rounded(value: f64, precision: u32) -> String {
    to_minimal_decimal_string(round(value, precision))
}
