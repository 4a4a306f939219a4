use crate::value::{DataType, ValueFormat};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// The three families an addressable property can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyFamily {
    Connector,
    Device,
    Channel,
}

impl fmt::Display for PropertyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertyFamily::Connector => "connector",
            PropertyFamily::Device => "device",
            PropertyFamily::Channel => "channel",
        };
        f.write_str(s)
    }
}

/// Capability tag: only `Dynamic` properties carry mutable runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Static,
    Dynamic,
}

/// An addressable property.
///
/// A property with a `parent` is a mapping onto another property of the same
/// family; resolution always redirects state operations to the parent, so
/// mapping metadata stays plain data rather than a subtype relationship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub family: PropertyFamily,
    pub kind: PropertyKind,
    /// Canonical parent for mapping properties.
    #[serde(default)]
    pub parent: Option<Uuid>,
    /// Declared data type used when coercing stored values for the exchange.
    pub data_type: DataType,
    /// Declared value format (enum members, numeric range).
    #[serde(default)]
    pub format: Option<ValueFormat>,
    /// Sentinel substituted when a stored value fails coercion.
    #[serde(default)]
    pub invalid: Option<String>,
    /// Static attributes exposed verbatim in snapshot events.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl Property {
    /// True only for the dynamic kind; callers must apply parent redirection
    /// first for mapping properties.
    pub fn is_dynamic(&self) -> bool {
        self.kind == PropertyKind::Dynamic
    }

    /// Static projection merged into snapshot events.
    pub fn to_exchange(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("id".into(), Value::String(self.id.to_string()));
        data.insert("family".into(), Value::String(self.family.to_string()));
        if let Some(parent) = self.parent {
            data.insert("parent".into(), Value::String(parent.to_string()));
        }
        for (k, v) in &self.attributes {
            data.insert(k.clone(), v.clone());
        }
        data
    }
}
