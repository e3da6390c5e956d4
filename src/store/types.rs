//! Battery report types.

use std::fmt;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Percentage shown before any report has been received.
pub const UNKNOWN_PERCENTAGE: &str = "Unknown";

/// Timestamp shown before any report has been received.
pub const NEVER_UPDATED: &str = "Never";

/// The last battery report received from the phone.
///
/// Both fields are already formatted for display; the relay never interprets
/// them again after a report is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryReport {
    /// Reported percentage, stringified as received.
    pub percentage: String,
    /// Local time the report was stored.
    pub updated_at: String,
}

impl BatteryReport {
    /// Report used until the phone sends its first update.
    pub fn unknown() -> Self {
        Self {
            percentage: UNKNOWN_PERCENTAGE.to_string(),
            updated_at: NEVER_UPDATED.to_string(),
        }
    }

    /// True while no report has been received.
    pub fn is_unknown(&self) -> bool {
        self.percentage == UNKNOWN_PERCENTAGE && self.updated_at == NEVER_UPDATED
    }
}

impl Default for BatteryReport {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Convert a reported percentage to its stored text.
///
/// Any JSON value is accepted and rendered the way a JavaScript template
/// string would render it: numbers in shortest round-trip form with exponent
/// notation outside `[1e-6, 1e21)`, arrays joined with `,` and objects as
/// `[object Object]`.
pub fn stringify_percentage(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => to_js_string(other),
    }
}

fn to_js_string(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) => number_to_js_string(f),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        // Array.prototype.join renders null elements as empty.
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(to_js_string).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// `Number.prototype.toString()` for finite values.
fn number_to_js_string(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if !f.is_finite() {
        return if f.is_nan() {
            "NaN".to_string()
        } else if f > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if f < 0.0 {
        return format!("-{}", number_to_js_string(-f));
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e-7".
    let sci = format!("{:e}", f);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci,
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = match exponent.parse::<i32>() {
        Ok(e) => e + 1,
        Err(_) => return sci,
    };

    if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, (n - 1).abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, (n - 1).abs())
        }
    }
}

/// Validated `chrono` layout for report timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat(String);

impl TimestampFormat {
    /// en-US locale layout, e.g. `10/19/2026, 3:04:05 PM`.
    ///
    /// The space before AM/PM is ASCII. ICU 72+ (Node 20+) emits U+202F
    /// there; clients matching on text expect the plain space.
    pub const EN_US: &'static str = "%-m/%-d/%Y, %-I:%M:%S %p";

    /// Parse a layout, rejecting empty strings and unknown specifiers.
    pub fn new(layout: &str) -> Result<Self, String> {
        if layout.is_empty() {
            return Err("timestamp layout is empty".to_string());
        }

        if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
            return Err(format!("unsupported specifier in {:?}", layout));
        }

        Ok(Self(layout.to_string()))
    }

    /// Render a point in time with this layout.
    pub fn render<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        at.format(&self.0).to_string()
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self(Self::EN_US.to_string())
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
