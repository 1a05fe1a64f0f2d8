//! Human-readable number formatting for display.

use crate::big::BigNum;

/// Short-scale suffixes, one per power of 1000 from 1e3 to 1e33.
const SUFFIXES: [&str; 11] = ["K", "M", "B", "T", "Qa", "Qi", "Sx", "Sp", "Oc", "No", "Dc"];

/// Compact form: `999`, `1.5K`, `12.3M`, ... `4.0Dc`, then `1.23e36`.
pub fn format_short(value: BigNum) -> String {
    if value < BigNum::from_u64(1_000) {
        return format!("{}", value.floor().to_u64_saturating());
    }
    if value.is_small() {
        let mut scaled = value.to_f64() / 1000.0;
        let mut group = 1;
        // 999.95K would print as "1000.0K"; carry it into the next suffix.
        while scaled >= 999.95 && group < SUFFIXES.len() {
            scaled /= 1000.0;
            group += 1;
        }
        if scaled < 999.95 {
            return format!("{:.1}{}", scaled, SUFFIXES[group - 1]);
        }
    }
    scientific(value.log10())
}

fn scientific(log: f64) -> String {
    let mut exponent = log.floor();
    let mut mantissa = 10f64.powf(log - exponent);
    if mantissa >= 9.995 {
        mantissa /= 10.0;
        exponent += 1.0;
    }
    format!("{:.2}e{}", mantissa, exponent as i64)
}

/// `1234567` → `"1,234,567"`. Values too large to hold every digit fall back
/// to `format_short`.
pub fn format_grouped(value: BigNum) -> String {
    let v = value.floor();
    if !v.is_small() || v.to_f64() >= 1e15 {
        return format_short(value);
    }
    let digits = v.to_u64_saturating().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
