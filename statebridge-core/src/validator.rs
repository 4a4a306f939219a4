use serde_json::Value;
use statebridge_error::{exchange::ExchangeError, ExchangeResult};
use statebridge_models::{
    constants::LOG_SOURCE, ActionPayload, ChannelActionPayload, ChannelPropertyActionPayload,
    ConnectorActionPayload, DeviceActionPayload, DevicePropertyActionPayload, PayloadSchema,
    RoutingKey, TriggerActionPayload,
};
use tracing::{debug, error};

/// Validates raw command payloads against the schema bound to a routing key.
///
/// Three internal failure classes map onto one externally visible error kind
/// but are logged at different severities: malformed input and catch-all
/// validation failures are operator-actionable (error level), schema
/// violations are expected client mistakes (debug level).
#[derive(Debug, Default)]
pub struct DataValidator;

impl DataValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, raw: &Value, key: RoutingKey) -> ExchangeResult<ActionPayload> {
        let schema = key
            .schema()
            .ok_or_else(|| ExchangeError::UnsupportedRoutingKey(key.to_string()))?;

        if !raw.is_object() {
            let detail = format!("payload for {key} is not a JSON object");
            error!(
                source = LOG_SOURCE,
                r#type = "parse-data",
                code = "malformed_payload",
                "Received message could not be validated: {detail}"
            );
            return Err(ExchangeError::MalformedPayload(detail));
        }

        let payload = Self::deserialize(schema, raw).map_err(|e| {
            debug!(
                source = LOG_SOURCE,
                r#type = "parse-data",
                code = "payload_schema",
                "Received message is not valid: {e}"
            );
            ExchangeError::PayloadSchema(e.to_string())
        })?;

        payload.validate().map_err(|e| {
            error!(
                source = LOG_SOURCE,
                r#type = "parse-data",
                code = "payload_validation",
                "Received message is not valid: {e}"
            );
            ExchangeError::PayloadValidation(e.to_string())
        })?;

        Ok(payload)
    }

    fn deserialize(schema: PayloadSchema, raw: &Value) -> serde_json::Result<ActionPayload> {
        let raw = raw.clone();
        Ok(match schema {
            PayloadSchema::ConnectorAction => {
                ActionPayload::Connector(serde_json::from_value::<ConnectorActionPayload>(raw)?)
            }
            PayloadSchema::DeviceAction => {
                ActionPayload::Device(serde_json::from_value::<DeviceActionPayload>(raw)?)
            }
            PayloadSchema::DevicePropertyAction => ActionPayload::DeviceProperty(
                serde_json::from_value::<DevicePropertyActionPayload>(raw)?,
            ),
            PayloadSchema::ChannelAction => {
                ActionPayload::Channel(serde_json::from_value::<ChannelActionPayload>(raw)?)
            }
            PayloadSchema::ChannelPropertyAction => ActionPayload::ChannelProperty(
                serde_json::from_value::<ChannelPropertyActionPayload>(raw)?,
            ),
            PayloadSchema::TriggerAction => {
                ActionPayload::Trigger(serde_json::from_value::<TriggerActionPayload>(raw)?)
            }
        })
    }
}
