use crate::property::PropertyFamily;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Closed set of routing keys understood by the exchange.
///
/// The six `*Action` keys are the only keys admitted on the inbound command
/// path; the three `*PropertyReported` keys tag outbound subscription
/// snapshot events and are never accepted inbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoutingKey {
    #[serde(rename = "exchange.connector.action")]
    ConnectorAction,
    #[serde(rename = "exchange.device.action")]
    DeviceAction,
    #[serde(rename = "exchange.device.property.action")]
    DevicePropertyAction,
    #[serde(rename = "exchange.channel.action")]
    ChannelAction,
    #[serde(rename = "exchange.channel.property.action")]
    ChannelPropertyAction,
    #[serde(rename = "exchange.trigger.action")]
    TriggerAction,
    #[serde(rename = "exchange.connector.property.reported")]
    ConnectorPropertyReported,
    #[serde(rename = "exchange.device.property.reported")]
    DevicePropertyReported,
    #[serde(rename = "exchange.channel.property.reported")]
    ChannelPropertyReported,
}

/// Payload schema bound to an action routing key.
///
/// Keeping the key-to-schema binding as a single lookup keeps the six-way
/// dispatch auditable in one place instead of scattered branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSchema {
    ConnectorAction,
    DeviceAction,
    DevicePropertyAction,
    ChannelAction,
    ChannelPropertyAction,
    TriggerAction,
}

impl RoutingKey {
    /// The six keys admitted on the inbound command path, in wire order.
    pub const ACTION_KEYS: [RoutingKey; 6] = [
        RoutingKey::ConnectorAction,
        RoutingKey::DeviceAction,
        RoutingKey::DevicePropertyAction,
        RoutingKey::ChannelAction,
        RoutingKey::ChannelPropertyAction,
        RoutingKey::TriggerAction,
    ];

    /// Stable wire string for this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingKey::ConnectorAction => "exchange.connector.action",
            RoutingKey::DeviceAction => "exchange.device.action",
            RoutingKey::DevicePropertyAction => "exchange.device.property.action",
            RoutingKey::ChannelAction => "exchange.channel.action",
            RoutingKey::ChannelPropertyAction => "exchange.channel.property.action",
            RoutingKey::TriggerAction => "exchange.trigger.action",
            RoutingKey::ConnectorPropertyReported => "exchange.connector.property.reported",
            RoutingKey::DevicePropertyReported => "exchange.device.property.reported",
            RoutingKey::ChannelPropertyReported => "exchange.channel.property.reported",
        }
    }

    /// Whether this key is one of the six inbound action keys.
    pub fn is_action(&self) -> bool {
        self.schema().is_some()
    }

    /// Schema bound to this key; `None` for reported (outbound-only) keys.
    pub fn schema(&self) -> Option<PayloadSchema> {
        match self {
            RoutingKey::ConnectorAction => Some(PayloadSchema::ConnectorAction),
            RoutingKey::DeviceAction => Some(PayloadSchema::DeviceAction),
            RoutingKey::DevicePropertyAction => Some(PayloadSchema::DevicePropertyAction),
            RoutingKey::ChannelAction => Some(PayloadSchema::ChannelAction),
            RoutingKey::ChannelPropertyAction => Some(PayloadSchema::ChannelPropertyAction),
            RoutingKey::TriggerAction => Some(PayloadSchema::TriggerAction),
            RoutingKey::ConnectorPropertyReported
            | RoutingKey::DevicePropertyReported
            | RoutingKey::ChannelPropertyReported => None,
        }
    }

    /// Reported key tagging snapshot events for a property family.
    pub fn reported_for(family: PropertyFamily) -> RoutingKey {
        match family {
            PropertyFamily::Connector => RoutingKey::ConnectorPropertyReported,
            PropertyFamily::Device => RoutingKey::DevicePropertyReported,
            PropertyFamily::Channel => RoutingKey::ChannelPropertyReported,
        }
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exchange.connector.action" => Ok(RoutingKey::ConnectorAction),
            "exchange.device.action" => Ok(RoutingKey::DeviceAction),
            "exchange.device.property.action" => Ok(RoutingKey::DevicePropertyAction),
            "exchange.channel.action" => Ok(RoutingKey::ChannelAction),
            "exchange.channel.property.action" => Ok(RoutingKey::ChannelPropertyAction),
            "exchange.trigger.action" => Ok(RoutingKey::TriggerAction),
            "exchange.connector.property.reported" => Ok(RoutingKey::ConnectorPropertyReported),
            "exchange.device.property.reported" => Ok(RoutingKey::DevicePropertyReported),
            "exchange.channel.property.reported" => Ok(RoutingKey::ChannelPropertyReported),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_round_trip() {
        for key in RoutingKey::ACTION_KEYS {
            assert_eq!(key.as_str().parse::<RoutingKey>(), Ok(key));
        }
    }

    #[test]
    fn action_keys_have_schemas_and_reported_keys_do_not() {
        for key in RoutingKey::ACTION_KEYS {
            assert!(key.is_action());
        }
        assert!(!RoutingKey::DevicePropertyReported.is_action());
        assert!(!RoutingKey::ChannelPropertyReported.is_action());
        assert!(!RoutingKey::ConnectorPropertyReported.is_action());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!("exchange.gateway.action".parse::<RoutingKey>().is_err());
    }
}
