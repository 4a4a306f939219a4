use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Declared data type of a property, used to coerce the opaque stored value
/// strings into typed JSON on the exchange boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Boolean,
    Int,
    Uint,
    Float,
    Enum,
    String,
}

/// Declared value format constraining coercion results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// Inclusive numeric range; either bound may be open.
    Range {
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Allowed enum members (matched case-insensitively).
    Members(Vec<String>),
}

#[inline]
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" | "y" | "t" => Some(true),
        "false" | "0" | "off" | "no" | "n" | "f" => Some(false),
        _ => None,
    }
}

#[inline]
fn parse_f64(s: &str) -> Option<f64> {
    let parsed = s.trim().parse::<f64>().ok()?;
    parsed.is_finite().then_some(parsed)
}

#[inline]
fn in_range(value: f64, format: Option<&ValueFormat>) -> bool {
    match format {
        Some(ValueFormat::Range { min, max }) => {
            min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
        }
        _ => true,
    }
}

/// Substitute for values that fail coercion: the property's declared invalid
/// sentinel when present, JSON null otherwise.
#[inline]
fn invalid_value(invalid: Option<&str>) -> Value {
    invalid.map_or(Value::Null, |s| Value::String(s.to_string()))
}

/// Flatten non-primitive coercion results to their string form; scalars pass
/// through untouched.
#[inline]
fn scalarize(value: Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        scalar => scalar,
    }
}

/// Coerce an opaque stored value string to the property's declared data type
/// and format for exchange output.
///
/// Returns `None` when there is no stored value. A value that cannot be
/// coerced (unparseable, out of range, not an enum member) yields the
/// invalid sentinel instead of an error: exchange output is best-effort.
pub fn normalize_value(
    data_type: DataType,
    format: Option<&ValueFormat>,
    invalid: Option<&str>,
    raw: Option<&str>,
) -> Option<Value> {
    let raw = raw?;

    let value = match data_type {
        DataType::Boolean => parse_bool(raw)
            .map(Value::Bool)
            .unwrap_or_else(|| invalid_value(invalid)),
        DataType::Int => parse_f64(raw)
            .map(|f| f.round())
            .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .filter(|f| in_range(*f, format))
            .map(|f| Value::Number(Number::from(f as i64)))
            .unwrap_or_else(|| invalid_value(invalid)),
        DataType::Uint => parse_f64(raw)
            .map(|f| f.round())
            .filter(|f| *f >= 0.0 && *f <= u64::MAX as f64)
            .filter(|f| in_range(*f, format))
            .map(|f| Value::Number(Number::from(f as u64)))
            .unwrap_or_else(|| invalid_value(invalid)),
        DataType::Float => parse_f64(raw)
            .filter(|f| in_range(*f, format))
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| invalid_value(invalid)),
        DataType::Enum => {
            let members = match format {
                Some(ValueFormat::Members(members)) => members.as_slice(),
                _ => &[],
            };
            members
                .iter()
                .find(|m| m.eq_ignore_ascii_case(raw.trim()))
                .map(|m| Value::String(m.clone()))
                .unwrap_or_else(|| invalid_value(invalid))
        }
        DataType::String => Value::String(raw.to_string()),
    };

    Some(scalarize(value))
}
