//! Display formatting for prices, returns and volumes.
//!
//! Absent values render as an em dash so table columns stay aligned.

/// Placeholder for values that are not defined.
pub const MISSING: &str = "—";

/// Insert thousands separators into the integer part of a formatted number.
pub fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// `12345.678` → `$12,345.68`. The currency symbol is `$` for USD and the
/// uppercase code otherwise (`1,234.00 EUR`).
pub fn price(value: f64, currency: &str) -> String {
    let amount = group_thousands(&format!("{:.2}", value.abs()));
    let sign = if value < 0.0 { "-" } else { "" };
    if currency.eq_ignore_ascii_case("usd") {
        format!("{sign}${amount}")
    } else {
        format!("{sign}{amount} {}", currency.to_uppercase())
    }
}

pub fn optional_price(value: Option<f64>, currency: &str) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| price(v, currency))
}

/// Fractional return as a percentage with two decimals: `0.0196` → `1.96%`.
pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

pub fn optional_percent(fraction: Option<f64>) -> String {
    fraction.map_or_else(|| MISSING.to_string(), percent)
}

pub fn volume(value: Option<u64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| group_thousands(&v.to_string()))
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
