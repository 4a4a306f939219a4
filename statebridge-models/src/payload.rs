use crate::property::PropertyFamily;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// Action verb carried by every command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Set,
    Get,
}

/// Deserialize an optional scalar (bool, number or string) into its canonical
/// string form. Arrays and objects are a schema violation.
fn de_opt_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected scalar value, got {other}"
        ))),
    }
}

/// Connector action. A payload carrying a `property` target doubles as the
/// connector-property control path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ConnectorActionPayload {
    pub action: ActionKind,
    pub connector: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<Uuid>,
    #[serde(
        default,
        deserialize_with = "de_opt_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(max = 1024))]
    pub expected_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DeviceActionPayload {
    pub action: ActionKind,
    pub device: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DevicePropertyActionPayload {
    pub action: ActionKind,
    pub device: Uuid,
    pub property: Uuid,
    #[serde(
        default,
        deserialize_with = "de_opt_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(max = 1024))]
    pub expected_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ChannelActionPayload {
    pub action: ActionKind,
    pub device: Uuid,
    pub channel: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ChannelPropertyActionPayload {
    pub action: ActionKind,
    pub device: Uuid,
    pub channel: Uuid,
    pub property: Uuid,
    #[serde(
        default,
        deserialize_with = "de_opt_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(max = 1024))]
    pub expected_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TriggerActionPayload {
    pub action: ActionKind,
    pub trigger: Uuid,
    #[serde(
        default,
        deserialize_with = "de_opt_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(max = 1024))]
    pub expected_value: Option<String>,
}

/// A validated command payload, one variant per action routing key.
///
/// Serialization is untagged: the routing key already identifies the shape
/// on the wire, so the forwarded data carries only the payload fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionPayload {
    Connector(ConnectorActionPayload),
    Device(DeviceActionPayload),
    DeviceProperty(DevicePropertyActionPayload),
    Channel(ChannelActionPayload),
    ChannelProperty(ChannelPropertyActionPayload),
    Trigger(TriggerActionPayload),
}

impl ActionPayload {
    pub fn action(&self) -> ActionKind {
        match self {
            ActionPayload::Connector(p) => p.action,
            ActionPayload::Device(p) => p.action,
            ActionPayload::DeviceProperty(p) => p.action,
            ActionPayload::Channel(p) => p.action,
            ActionPayload::ChannelProperty(p) => p.action,
            ActionPayload::Trigger(p) => p.action,
        }
    }

    /// The property this payload targets for state control, with its family.
    ///
    /// `None` for payloads that do not address a property (entity and trigger
    /// actions, or connector actions without a property target).
    pub fn property_target(&self) -> Option<(PropertyFamily, Uuid)> {
        match self {
            ActionPayload::DeviceProperty(p) => Some((PropertyFamily::Device, p.property)),
            ActionPayload::ChannelProperty(p) => Some((PropertyFamily::Channel, p.property)),
            ActionPayload::Connector(p) => {
                p.property.map(|id| (PropertyFamily::Connector, id))
            }
            _ => None,
        }
    }

    pub fn expected_value(&self) -> Option<&str> {
        match self {
            ActionPayload::Connector(p) => p.expected_value.as_deref(),
            ActionPayload::DeviceProperty(p) => p.expected_value.as_deref(),
            ActionPayload::ChannelProperty(p) => p.expected_value.as_deref(),
            ActionPayload::Trigger(p) => p.expected_value.as_deref(),
            _ => None,
        }
    }

    /// Run the `validator` rules of the inner payload.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            ActionPayload::Connector(p) => p.validate(),
            ActionPayload::Device(p) => p.validate(),
            ActionPayload::DeviceProperty(p) => p.validate(),
            ActionPayload::Channel(p) => p.validate(),
            ActionPayload::ChannelProperty(p) => p.validate(),
            ActionPayload::Trigger(p) => p.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_expected_value_is_canonicalized() {
        let payload: DevicePropertyActionPayload = serde_json::from_value(json!({
            "action": "set",
            "device": Uuid::new_v4(),
            "property": Uuid::new_v4(),
            "expected_value": 23.5,
        }))
        .unwrap();
        assert_eq!(payload.expected_value.as_deref(), Some("23.5"));
    }

    #[test]
    fn structured_expected_value_is_rejected() {
        let result = serde_json::from_value::<DevicePropertyActionPayload>(json!({
            "action": "set",
            "device": Uuid::new_v4(),
            "property": Uuid::new_v4(),
            "expected_value": {"nested": true},
        }));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_a_schema_violation() {
        let result = serde_json::from_value::<DeviceActionPayload>(json!({
            "action": "get",
            "device": Uuid::new_v4(),
            "bogus": 1,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn connector_payload_with_property_is_a_control_target() {
        let property = Uuid::new_v4();
        let payload = ActionPayload::Connector(ConnectorActionPayload {
            action: ActionKind::Set,
            connector: Uuid::new_v4(),
            property: Some(property),
            expected_value: Some("on".into()),
        });
        assert_eq!(
            payload.property_target(),
            Some((PropertyFamily::Connector, property))
        );
    }
}
