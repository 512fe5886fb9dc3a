//! Display formatting for amounts, counts and timestamps.
//!
//! Everything here is pure string building. Locale handling is fixed at
//! compile time: plain numbers use western thousands grouping, currency uses
//! Indian digit grouping (the backend reports amounts in INR).

use chrono::NaiveDateTime;

/// Placeholder rendered for absent values.
pub const DASH: &str = "\u{2014}";

/// Format a number with thousands grouping and at most two fraction digits.
///
/// Trailing fraction zeros are trimmed, mirroring how the insight tables
/// display server-computed values: `4591.3` stays `4,591.3`, `7000.0`
/// collapses to `7,000`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let int_part = abs.trunc() as u64;
    let frac = ((abs - abs.trunc()) * 100.0).round() as u64;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_western(int_part));
    if frac > 0 {
        if frac % 10 == 0 {
            out.push_str(&format!(".{}", frac / 10));
        } else {
            out.push_str(&format!(".{frac:02}"));
        }
    }
    out
}

/// Format an INR amount: rupee sign, Indian grouping, always two decimals.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("\u{20b9}{amount}");
    }
    let negative = amount < 0.0;
    let abs = amount.abs();
    let int_part = abs.trunc() as u64;
    let paise = ((abs - abs.trunc()) * 100.0).round() as u64;
    let (int_part, paise) = if paise >= 100 {
        (int_part + 1, 0)
    } else {
        (int_part, paise)
    };
    let sign = if negative { "-" } else { "" };
    format!("{sign}\u{20b9}{}.{paise:02}", group_indian(int_part))
}

/// Western grouping: digits in groups of three from the right.
fn group_western(mut n: u64) -> String {
    let mut groups: Vec<String> = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(",")
}

/// Indian grouping: the last three digits form one group, the rest pair up.
fn group_indian(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }
    let mut groups: Vec<String> = vec![format!("{:03}", n % 1000)];
    let mut rest = n / 1000;
    loop {
        if rest < 100 {
            groups.push(rest.to_string());
            break;
        }
        groups.push(format!("{:02}", rest % 100));
        rest /= 100;
    }
    groups.reverse();
    groups.join(",")
}

/// Short date used in the transaction grid: `23 Aug 2025`.
pub fn format_date(ts: NaiveDateTime) -> String {
    ts.format("%-d %b %Y").to_string()
}

/// Date with time, used in expanded row details: `23 Aug 2025, 16:44`.
pub fn format_datetime(ts: NaiveDateTime) -> String {
    ts.format("%-d %b %Y, %H:%M").to_string()
}

/// Free-text helper: dash placeholder for empty or absent strings.
pub fn text_or_dash(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => DASH.to_string(),
    }
}
