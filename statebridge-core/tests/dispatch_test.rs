mod common;

use common::*;
use serde_json::json;
use statebridge_core::PropertyStateStore;
use statebridge_error::exchange::ExchangeError;
use statebridge_models::{ActionMessage, ActionPayload, DataType, PropertyFamily, RoutingKey};
use std::sync::Arc;
use uuid::Uuid;

const DEVICE_PROPERTY_ACTION: &str = "exchange.device.property.action";
const CHANNEL_PROPERTY_ACTION: &str = "exchange.channel.property.action";
const CONNECTOR_ACTION: &str = "exchange.connector.action";
const DEVICE_ACTION: &str = "exchange.device.action";

fn set_payload(property: Uuid, expected: serde_json::Value) -> serde_json::Value {
    json!({
        "action": "set",
        "device": Uuid::new_v4(),
        "property": property,
        "expected_value": expected,
    })
}

#[tokio::test]
async fn missing_envelope_fields_touch_nothing() {
    let h = Harness::new();
    let prop = h
        .repository
        .insert(dynamic_property(PropertyFamily::Device, DataType::Float));

    let no_source = ActionMessage {
        routing_key: Some(DEVICE_PROPERTY_ACTION.into()),
        source: None,
        data: Some(set_payload(prop.id, json!(1))),
    };
    let err = h.gateway.handle_message(&no_source).await.unwrap_err();
    assert!(matches!(err, ExchangeError::InvalidMessage));

    let no_key = ActionMessage {
        routing_key: None,
        source: Some("client".into()),
        data: Some(set_payload(prop.id, json!(1))),
    };
    let err = h.gateway.handle_message(&no_key).await.unwrap_err();
    assert!(matches!(err, ExchangeError::InvalidMessage));

    assert!(h.device_store.find_state(&prop).await.unwrap().is_none());
    assert!(h.publisher.calls().is_empty());
}

#[tokio::test]
async fn unrecognized_routing_key_is_rejected() {
    let h = Harness::new();
    let msg = envelope("exchange.gateway.action", "client", None);
    let err = h.gateway.handle_message(&msg).await.unwrap_err();
    assert!(matches!(err, ExchangeError::UnsupportedRoutingKey(_)));
    assert!(h.publisher.calls().is_empty());
}

#[tokio::test]
async fn reported_keys_are_not_admitted_inbound() {
    let h = Harness::new();
    let msg = envelope("exchange.device.property.reported", "client", None);
    let err = h.gateway.handle_message(&msg).await.unwrap_err();
    assert!(matches!(err, ExchangeError::UnsupportedRoutingKey(_)));
    assert!(h.publisher.calls().is_empty());
}

#[tokio::test]
async fn schema_violation_aborts_before_publish() {
    let h = Harness::new();
    let msg = envelope(
        DEVICE_PROPERTY_ACTION,
        "client",
        Some(json!({"action": "set"})),
    );
    let err = h.gateway.handle_message(&msg).await.unwrap_err();
    assert!(matches!(err, ExchangeError::PayloadSchema(_)));
    assert!(h.publisher.calls().is_empty());
}

#[tokio::test]
async fn non_object_payload_is_malformed() {
    let h = Harness::new();
    let msg = envelope(DEVICE_PROPERTY_ACTION, "client", Some(json!("not-a-map")));
    let err = h.gateway.handle_message(&msg).await.unwrap_err();
    assert!(matches!(err, ExchangeError::MalformedPayload(_)));
    assert!(h.publisher.calls().is_empty());
}

#[tokio::test]
async fn set_on_unknown_property_fails_without_publish() {
    let h = Harness::new();
    let msg = envelope(
        DEVICE_PROPERTY_ACTION,
        "client",
        Some(set_payload(Uuid::new_v4(), json!(1))),
    );
    let err = h.gateway.handle_message(&msg).await.unwrap_err();
    assert!(matches!(err, ExchangeError::PropertyNotFound(_)));
    assert!(h.publisher.calls().is_empty());
}

#[tokio::test]
async fn set_on_static_property_is_not_controllable() {
    let h = Harness::new();
    let prop = h.repository.insert(static_property(PropertyFamily::Device));
    let msg = envelope(
        DEVICE_PROPERTY_ACTION,
        "client",
        Some(set_payload(prop.id, json!(1))),
    );
    let err = h.gateway.handle_message(&msg).await.unwrap_err();
    assert!(matches!(err, ExchangeError::NotControllable(_)));
    assert!(h.device_store.find_state(&prop).await.unwrap().is_none());
    assert!(h.publisher.calls().is_empty());
}

#[tokio::test]
async fn valid_set_creates_state_and_publishes_once() {
    let h = Harness::new();
    let prop = h
        .repository
        .insert(dynamic_property(PropertyFamily::Device, DataType::Float));

    let msg = envelope(
        DEVICE_PROPERTY_ACTION,
        "client",
        Some(set_payload(prop.id, json!(23.5))),
    );
    let ack = h.gateway.handle_message(&msg).await.unwrap();
    assert_eq!(ack.response, "accepted");

    let state = h
        .device_store
        .find_state(&prop)
        .await
        .unwrap()
        .expect("state created");
    assert_eq!(state.expected_value.as_deref(), Some("23.5"));
    assert!(state.pending);
    assert!(state.actual_value.is_none());

    let calls = h.publisher.calls();
    assert_eq!(calls.len(), 1);
    let (source, key, data) = &calls[0];
    assert_eq!(source, "client");
    assert_eq!(*key, RoutingKey::DevicePropertyAction);
    match data {
        Some(ActionPayload::DeviceProperty(p)) => {
            assert_eq!(p.property, prop.id);
            assert_eq!(p.expected_value.as_deref(), Some("23.5"));
        }
        other => panic!("unexpected published payload: {other:?}"),
    }
}

#[tokio::test]
async fn second_set_updates_state_in_place() {
    let h = Harness::new();
    let prop = h
        .repository
        .insert(dynamic_property(PropertyFamily::Device, DataType::Float));

    let first = envelope(
        DEVICE_PROPERTY_ACTION,
        "client",
        Some(set_payload(prop.id, json!(1))),
    );
    h.gateway.handle_message(&first).await.unwrap();
    let before = h.device_store.find_state(&prop).await.unwrap().unwrap();

    let second = envelope(
        DEVICE_PROPERTY_ACTION,
        "client",
        Some(set_payload(prop.id, json!(2))),
    );
    h.gateway.handle_message(&second).await.unwrap();
    let after = h.device_store.find_state(&prop).await.unwrap().unwrap();

    assert_eq!(after.expected_value.as_deref(), Some("2"));
    assert!(after.pending);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
    assert_eq!(h.publisher.calls().len(), 2);
}

#[tokio::test]
async fn set_on_mapping_mutates_the_parent_state() {
    let h = Harness::new();
    let parent = h
        .repository
        .insert(dynamic_property(PropertyFamily::Channel, DataType::Boolean));
    let mapping = h.repository.insert(mapping_property(
        PropertyFamily::Channel,
        parent.id,
        DataType::Boolean,
    ));

    let msg = envelope(
        CHANNEL_PROPERTY_ACTION,
        "client",
        Some(json!({
            "action": "set",
            "device": Uuid::new_v4(),
            "channel": Uuid::new_v4(),
            "property": mapping.id,
            "expected_value": true,
        })),
    );
    h.gateway.handle_message(&msg).await.unwrap();

    assert!(h.channel_store.find_state(&mapping).await.unwrap().is_none());
    let state = h
        .channel_store
        .find_state(&parent)
        .await
        .unwrap()
        .expect("parent state");
    assert_eq!(state.expected_value.as_deref(), Some("true"));
}

#[tokio::test]
async fn connector_set_reaches_the_connector_store() {
    let h = Harness::new();
    let prop = h
        .repository
        .insert(dynamic_property(PropertyFamily::Connector, DataType::Uint));

    let msg = envelope(
        CONNECTOR_ACTION,
        "client",
        Some(json!({
            "action": "set",
            "connector": Uuid::new_v4(),
            "property": prop.id,
            "expected_value": 8,
        })),
    );
    h.gateway.handle_message(&msg).await.unwrap();

    let state = h
        .connector_store
        .find_state(&prop)
        .await
        .unwrap()
        .expect("connector state");
    assert_eq!(state.expected_value.as_deref(), Some("8"));
}

#[tokio::test]
async fn non_set_command_publishes_without_mutation() {
    let h = Harness::new();
    let prop = h
        .repository
        .insert(dynamic_property(PropertyFamily::Device, DataType::Float));

    let msg = envelope(
        DEVICE_PROPERTY_ACTION,
        "client",
        Some(json!({
            "action": "get",
            "device": Uuid::new_v4(),
            "property": prop.id,
        })),
    );
    h.gateway.handle_message(&msg).await.unwrap();

    assert!(h.device_store.find_state(&prop).await.unwrap().is_none());
    assert_eq!(h.publisher.calls().len(), 1);
}

#[tokio::test]
async fn trigger_set_with_expected_value_forwards_without_mutation() {
    let h = Harness::new();
    let msg = envelope(
        "exchange.trigger.action",
        "client",
        Some(json!({
            "action": "set",
            "trigger": Uuid::new_v4(),
            "expected_value": true,
        })),
    );
    let ack = h.gateway.handle_message(&msg).await.unwrap();
    assert_eq!(ack.response, "accepted");

    let calls = h.publisher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, RoutingKey::TriggerAction);
    match &calls[0].2 {
        Some(ActionPayload::Trigger(p)) => {
            assert_eq!(p.expected_value.as_deref(), Some("true"));
        }
        other => panic!("unexpected published payload: {other:?}"),
    }
}

#[tokio::test]
async fn entity_action_without_data_is_still_forwarded() {
    let h = Harness::new();
    let msg = envelope(DEVICE_ACTION, "client", None);
    let ack = h.gateway.handle_message(&msg).await.unwrap();
    assert_eq!(ack.response, "accepted");

    let calls = h.publisher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, RoutingKey::DeviceAction);
    assert!(calls[0].2.is_none());
}

#[tokio::test]
async fn concurrent_sets_on_one_property_serialize() {
    let h = Harness::new();
    let prop = h
        .repository
        .insert(dynamic_property(PropertyFamily::Device, DataType::Int));

    let mut handles = Vec::new();
    for i in 0..8 {
        let gateway = Arc::clone(&h.gateway);
        let msg = envelope(
            DEVICE_PROPERTY_ACTION,
            "client",
            Some(set_payload(prop.id, json!(i))),
        );
        handles.push(tokio::spawn(async move {
            gateway.handle_message(&msg).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("set accepted");
    }

    // Exactly one state record survives; no duplicate create slipped through.
    let state = h
        .device_store
        .find_state(&prop)
        .await
        .unwrap()
        .expect("single state record");
    assert!(state.pending);
    assert_eq!(h.publisher.calls().len(), 8);
}
