//! Portfolio valuation and the ingestion pipeline.
//!
//! Every function here is total: degenerate input produces a neutral value
//! (0 or the input unchanged) instead of an error.

use crate::types::{Position, RawRecord};
use serde_json::Value;

/// Calculate total portfolio value.
///
/// `sum(quantity * rate)` over all positions, with a missing/zero rate counted as 1.
/// Returns 0 for an empty portfolio.
pub fn total_value(positions: &[Position]) -> f64 {
    positions.iter().map(Position::value).sum()
}

/// Attach each position's share of total value as `proportion`.
///
/// Preserves input order. When the total value is zero the positions are
/// returned unchanged, without a proportion.
pub fn position_ratios(positions: &[Position]) -> Vec<Position> {
    let total = total_value(positions);
    if total == 0.0 {
        if !positions.is_empty() {
            tracing::warn!(
                positions = positions.len(),
                "Total portfolio value is zero, skipping proportions"
            );
        }
        return positions.to_vec();
    }

    positions
        .iter()
        .map(|p| Position {
            proportion: Some(p.value() / total),
            ..p.clone()
        })
        .collect()
}

/// Calculate profit/loss: `(current_price - open_price) * quantity`.
///
/// A zero or NaN quantity yields 0; NaN prices count as 0.
pub fn profit_loss(position: &Position) -> f64 {
    if position.quantity == 0.0 || position.quantity.is_nan() {
        return 0.0;
    }

    let current = or_default(position.current_price, 0.0);
    let open = or_default(position.open_price, 0.0);
    (current - open) * position.quantity
}

/// Normalize raw records into typed positions, then attach proportions and P/L.
///
/// Field defaults: `currency` is empty, `rate` is 1, every other numeric field is 0.
/// Values that are missing, non-numeric or zero collapse to the default. Running
/// this again on its own (serialized) output leaves numeric fields unchanged.
pub fn process_portfolio_data(raw: &[RawRecord]) -> Vec<Position> {
    if raw.is_empty() {
        return Vec::new();
    }

    let normalized: Vec<Position> = raw.iter().map(normalize_record).collect();

    position_ratios(&normalized)
        .into_iter()
        .map(|p| {
            let benefit = profit_loss(&p);
            Position {
                benefit: Some(benefit),
                ..p
            }
        })
        .collect()
}

/// Coerce a single raw record into a [`Position`] without computing derived fields.
pub fn normalize_record(record: &RawRecord) -> Position {
    Position {
        currency: coerce_currency(record.get("currency")),
        quantity: coerce_number(record.get("quantity"), 0.0),
        rate: coerce_number(record.get("rate"), 1.0),
        current_price: coerce_number(field(record, "currentPrice", "current_price"), 0.0),
        open_price: coerce_number(field(record, "openPrice", "open_price"), 0.0),
        daily_volatility: coerce_number(
            field(record, "dailyVolatility", "daily_volatility"),
            0.0,
        ),
        proportion: None,
        benefit: None,
    }
}

fn field<'a>(record: &'a RawRecord, camel: &str, snake: &str) -> Option<&'a Value> {
    record.get(camel).or_else(|| record.get(snake))
}

/// Coerce a raw value to a number, substituting `default` for 0 and NaN.
pub fn coerce_number(value: Option<&Value>, default: f64) -> f64 {
    or_default(value.map_or(0.0, to_number), default)
}

fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number(s),
        // Arrays convert through their text form: `[]` and `[null]` are blank,
        // `[x]` is x, booleans and objects inside are not numeric.
        Value::Array(items) => match items.as_slice() {
            [] | [Value::Null] => 0.0,
            [Value::Bool(_)] | [Value::Object(_)] => f64::NAN,
            [item] => to_number(item),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

/// Parse a textual number. Blank text is 0, anything unparseable is NaN.
///
/// Accepts unsigned `0x`, `0o` and `0b` integer literals.
fn parse_number(text: &str) -> f64 {
    let t = text.trim();
    match t {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(n) = parse_radix_literal(t) {
        return n;
    }

    // Rust accepts "inf" and "nan" spellings that are not numbers here.
    if t
        .bytes()
        .any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E')
    {
        return f64::NAN;
    }

    t.parse().unwrap_or(f64::NAN)
}

/// `None` when `text` has no radix prefix, NaN when the digits are invalid.
fn parse_radix_literal(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    let value = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    });
    Some(value.unwrap_or(f64::NAN))
}

fn coerce_currency(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn or_default(n: f64, default: f64) -> f64 {
    if n == 0.0 || n.is_nan() {
        default
    } else {
        n
    }
}
