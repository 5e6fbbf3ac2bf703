// src/process/damage.rs

use once_cell::sync::Lazy;
use regex::Regex;

static DAMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*([0-9]*\.?[0-9]+)\s*([KMB])?\s*$").expect("damage regex should compile")
});

/// A damage cell as it may arrive from a source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageValue<'a> {
    Absent,
    Numeric(f64),
    Text(&'a str),
}

impl<'a> From<Option<&'a str>> for DamageValue<'a> {
    fn from(v: Option<&'a str>) -> Self {
        v.map_or(DamageValue::Absent, DamageValue::Text)
    }
}

/// Convert a damage value to dollars. Never fails: anything that cannot be
/// read as `<number>[K|M|B]` is 0.0.
///
/// ```
/// use stormscraper::process::damage::{parse_damage_to_dollars, DamageValue};
/// assert_eq!(parse_damage_to_dollars(DamageValue::Text("10.5K")), 10_500.0);
/// assert_eq!(parse_damage_to_dollars(DamageValue::Text("n/a")), 0.0);
/// ```
pub fn parse_damage_to_dollars(value: DamageValue<'_>) -> f64 {
    let s = match value {
        DamageValue::Absent => return 0.0,
        DamageValue::Numeric(n) if n.is_nan() => return 0.0,
        DamageValue::Numeric(n) => return n,
        DamageValue::Text(s) => s.trim(),
    };
    if s.is_empty() || s.eq_ignore_ascii_case("NA") || s.eq_ignore_ascii_case("N/A") {
        return 0.0;
    }

    let Some(caps) = DAMAGE_RE.captures(s) else {
        return 0.0;
    };
    let Ok(amount) = caps[1].parse::<f64>() else {
        return 0.0;
    };
    let mult = match caps.get(2).map(|m| m.as_str().to_ascii_uppercase()).as_deref() {
        Some("K") => 1_000.0,
        Some("M") => 1_000_000.0,
        Some("B") => 1_000_000_000.0,
        _ => 1.0,
    };
    amount * mult
}

/// Lenient numeric coercion for counts and magnitudes: unparsable is 0.0.
pub fn coerce_measure(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0)
}

/// Integer codes (yearmonth, ids, times). Unparsable stays null.
pub fn parse_integer(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim();
    s.parse::<i64>().ok().or_else(|| {
        // exports occasionally carry integral floats such as "201503.0"
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    })
}
