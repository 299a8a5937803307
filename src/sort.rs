use chrono::DateTime;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Sort records by a date field.
///
/// The sort is stable: records with equal timestamps keep their incoming
/// order. Records whose field is missing or unparseable go last in either
/// direction, also in incoming order.
pub fn sort_by_date(records: &mut [Value], key: &str, direction: Direction) {
    // Each timestamp is parsed once, not once per comparison.
    let mut keyed: Vec<(Option<f64>, Value)> = records
        .iter_mut()
        .map(|record| (timestamp_millis(record.get(key)), std::mem::take(record)))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_dates(*a, *b, direction));

    for (slot, (_, record)) in records.iter_mut().zip(keyed) {
        *slot = record;
    }
}

fn compare_dates(a: Option<f64>, b: Option<f64>, direction: Direction) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            match direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Interpret a field as a point in time.
///
/// Accepts RFC 3339 strings (what Drupal JSON:API emits for `changed`),
/// plain numbers and numeric strings. Numbers are compared as-is, so a
/// collection is expected to use one representation throughout.
fn timestamp_millis(value: Option<&Value>) -> Option<f64> {
    let ts = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.timestamp_millis() as f64)
                .or_else(|| s.parse::<f64>().ok())
        }
        _ => None,
    };

    ts.filter(|ts| ts.is_finite())
}
