use crate::{property::Property, value::normalize_value};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Runtime state of a dynamic property.
///
/// At most one state record exists per dynamic property, and absence is a
/// valid condition (the property was never commanded). The exchange core
/// writes only `expected_value` and `pending`; `actual_value` and `valid`
/// belong to the external value-reporting pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyState {
    pub actual_value: Option<String>,
    pub expected_value: Option<String>,
    pub pending: bool,
    pub valid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable field set for state create/update operations.
///
/// Outer `Option` means "leave untouched"; the inner value is written as-is.
/// The set is restricted to the fields an external pipeline or this core may
/// legally touch; timestamps are managed by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateFields {
    pub actual_value: Option<Option<String>>,
    pub expected_value: Option<Option<String>>,
    pub pending: Option<bool>,
    pub valid: Option<bool>,
}

impl StateFields {
    /// Field set written by the command "set" path: a new expected value with
    /// the pending flag raised until hardware confirms.
    pub fn expected(value: Option<String>) -> Self {
        Self {
            expected_value: Some(value),
            pending: Some(true),
            ..Self::default()
        }
    }
}

impl PropertyState {
    /// Build a fresh state record from an initial field set.
    pub fn create(fields: StateFields) -> Self {
        let now = Utc::now();
        let mut state = Self {
            actual_value: None,
            expected_value: None,
            pending: false,
            valid: false,
            created_at: now,
            updated_at: now,
        };
        state.apply(fields);
        state
    }

    /// Apply a field set; `updated_at` is refreshed on every call.
    pub fn apply(&mut self, fields: StateFields) {
        if let Some(actual) = fields.actual_value {
            self.actual_value = actual;
        }
        if let Some(expected) = fields.expected_value {
            self.expected_value = expected;
        }
        if let Some(pending) = fields.pending {
            self.pending = pending;
        }
        if let Some(valid) = fields.valid {
            self.valid = valid;
        }
        self.updated_at = Utc::now();
    }

    /// Exchange projection: value strings coerced to the property's declared
    /// data type, invalid sentinel substituted on coercion failure.
    pub fn to_exchange(&self, property: &Property) -> Map<String, Value> {
        let actual = normalize_value(
            property.data_type,
            property.format.as_ref(),
            property.invalid.as_deref(),
            self.actual_value.as_deref(),
        );
        let expected = normalize_value(
            property.data_type,
            property.format.as_ref(),
            property.invalid.as_deref(),
            self.expected_value.as_deref(),
        );

        let mut data = Map::new();
        data.insert("actual_value".into(), actual.unwrap_or(Value::Null));
        data.insert("expected_value".into(), expected.unwrap_or(Value::Null));
        data.insert("pending".into(), Value::Bool(self.pending));
        data.insert("valid".into(), Value::Bool(self.valid));
        data
    }

    /// Full diagnostic projection including timestamps.
    pub fn to_json(&self) -> Value {
        json!({
            "actual_value": self.actual_value,
            "expected_value": self.expected_value,
            "pending": self.pending,
            "valid": self.valid,
            "created_at": self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "updated_at": self.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }
}
