//! Numeric semantics shared by the value model and operator dispatch.
//!
//! Division and modulo follow the floor convention: the remainder always
//! carries the sign of the divisor (or is zero). Integer arithmetic wraps
//! on overflow. None of these functions raise; the integer division
//! helpers require a nonzero divisor and callers check for zero first.

/// 2^63 as a float, the first value past the `i64` range.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// Significant digits used when rendering floats as text.
const FLOAT_DIGITS: i32 = 14;

/// Integer floor division. `b` must be nonzero.
pub fn ifloor_div(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    if a.wrapping_rem(b) != 0 && (a < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Float floor division. Infinities and NaN propagate per IEEE-754.
pub fn ffloor_div(a: f64, b: f64) -> f64 {
    (a / b).floor()
}

/// Integer modulo, `a - ifloor_div(a, b) * b`. `b` must be nonzero.
pub fn imod(a: i64, b: i64) -> i64 {
    a.wrapping_sub(ifloor_div(a, b).wrapping_mul(b))
}

/// Float modulo, `a - ffloor_div(a, b) * b`.
pub fn fmod(a: f64, b: f64) -> f64 {
    a - ffloor_div(a, b) * b
}

/// Logical left shift; a negative count shifts right instead.
///
/// Counts of 64 or more in either direction produce zero.
pub fn shift_left(a: i64, n: i64) -> i64 {
    if n <= -64 || n >= 64 {
        0
    } else if n >= 0 {
        ((a as u64) << n) as i64
    } else {
        ((a as u64) >> -n) as i64
    }
}

/// Logical right shift; a negative count shifts left instead.
pub fn shift_right(a: i64, n: i64) -> i64 {
    if n <= -64 || n >= 64 {
        0
    } else if n >= 0 {
        ((a as u64) >> n) as i64
    } else {
        ((a as u64) << -n) as i64
    }
}

/// Narrow a float to an integer only when the conversion is lossless.
pub fn float_to_integer(f: f64) -> Option<i64> {
    // NaN fails both comparisons.
    if (-TWO_POW_63..TWO_POW_63).contains(&f) {
        let i = f as i64;
        (i as f64 == f).then_some(i)
    } else {
        None
    }
}

/// Parse a base-10 integer literal. Returns `None` if the text does not parse.
pub fn parse_integer(s: &[u8]) -> Option<i64> {
    std::str::from_utf8(s).ok()?.parse().ok()
}

/// Parse a float literal. Returns `None` if the text does not parse.
pub fn parse_float(s: &[u8]) -> Option<f64> {
    std::str::from_utf8(s).ok()?.parse().ok()
}

/// Render an integer in its canonical text form.
pub fn integer_to_text(i: i64) -> String {
    i.to_string()
}

/// Render a float in its canonical text form.
///
/// Uses `%.14g` layout. When the result would read back as an integer
/// literal, `.0` is appended so the float subtype stays visible.
pub fn float_to_text(f: f64) -> String {
    if f.is_nan() {
        return if f.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if f.is_infinite() {
        return if f < 0.0 { "-inf" } else { "inf" }.to_string();
    }

    let mut text = format_general(f);
    if text.bytes().all(|b| b == b'-' || b.is_ascii_digit()) {
        text.push_str(".0");
    }
    text
}

/// C `%.14g` for finite values.
fn format_general(f: f64) -> String {
    let precision = (FLOAT_DIGITS - 1) as usize;
    let scientific = format!("{f:.precision$e}");
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= FLOAT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (FLOAT_DIGITS - 1 - exponent) as usize;
        trim_fraction(&format!("{f:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
