use crate::store::StoreError;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while handling inbound exchange messages.
///
/// Every variant except `Store` and `Publish` belongs to the
/// Invalid-Request family: the transport layer turns it into an error
/// response, and it is guaranteed that no state mutation and no downstream
/// publish happened once one of these is raised.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Envelope is missing `routing_key` or `source`.
    #[error("provided message has invalid format")]
    InvalidMessage,
    /// Envelope carries a routing key outside the six enumerated action keys.
    #[error("provided message has unsupported routing key: {0}")]
    UnsupportedRoutingKey(String),
    /// Payload is not a JSON object or could not be read at all.
    #[error("provided data are not valid json format")]
    MalformedPayload(String),
    /// Payload is well-formed but does not match the routing key's schema.
    #[error("provided data are not in valid structure")]
    PayloadSchema(String),
    /// Catch-all for payload validation failures outside the schema check.
    #[error("provided data could not be validated")]
    PayloadValidation(String),
    /// Target property does not resolve within the requested family.
    #[error("property could not be found: {0}")]
    PropertyNotFound(Uuid),
    /// Target property does not carry runtime state.
    #[error("only dynamic properties can be controlled: {0}")]
    NotControllable(Uuid),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("message bus publish failed: {0}")]
    Publish(String),
}

impl ExchangeError {
    /// Stable code for the `{source, type, message, code}` log shape.
    pub fn code(&self) -> &'static str {
        match self {
            ExchangeError::InvalidMessage => "invalid_message",
            ExchangeError::UnsupportedRoutingKey(_) => "unsupported_routing_key",
            ExchangeError::MalformedPayload(_) => "malformed_payload",
            ExchangeError::PayloadSchema(_) => "payload_schema",
            ExchangeError::PayloadValidation(_) => "payload_validation",
            ExchangeError::PropertyNotFound(_) => "property_not_found",
            ExchangeError::NotControllable(_) => "not_controllable",
            ExchangeError::Store(e) => e.code(),
            ExchangeError::Publish(_) => "publish_failed",
        }
    }

    /// Whether the error should be reported to the caller as a bad request.
    pub fn is_invalid_request(&self) -> bool {
        !matches!(self, ExchangeError::Store(_) | ExchangeError::Publish(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn validation_errors_are_bad_requests_and_infrastructure_errors_are_not() {
        assert!(ExchangeError::InvalidMessage.is_invalid_request());
        assert!(ExchangeError::UnsupportedRoutingKey("x".into()).is_invalid_request());
        assert!(ExchangeError::PropertyNotFound(Uuid::new_v4()).is_invalid_request());
        assert!(ExchangeError::NotControllable(Uuid::new_v4()).is_invalid_request());

        let store = ExchangeError::Store(StoreError::StateNotFound(Uuid::new_v4()));
        assert!(!store.is_invalid_request());
        assert!(!ExchangeError::Publish("bus down".into()).is_invalid_request());
    }
}
