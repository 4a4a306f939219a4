#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Map, Value};
use statebridge_core::{
    ExchangeClient, ExchangeGateway, ExchangePublisher, ExchangeStores, InMemoryPropertyRepository,
    InMemoryStateStore, Topic,
};
use statebridge_error::{BridgeResult, ExchangeResult};
use statebridge_models::{
    ActionMessage, ActionPayload, DataType, Property, PropertyFamily, PropertyKind, RoutingKey,
    Settings,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use uuid::Uuid;

pub fn property(family: PropertyFamily, kind: PropertyKind, data_type: DataType) -> Property {
    let mut attributes = Map::new();
    attributes.insert("name".into(), Value::String("prop".into()));
    Property {
        id: Uuid::new_v4(),
        family,
        kind,
        parent: None,
        data_type,
        format: None,
        invalid: None,
        attributes,
    }
}

pub fn dynamic_property(family: PropertyFamily, data_type: DataType) -> Property {
    property(family, PropertyKind::Dynamic, data_type)
}

pub fn static_property(family: PropertyFamily) -> Property {
    property(family, PropertyKind::Static, DataType::String)
}

/// A mapping onto `parent`: carries no state of its own, state operations
/// redirect to the parent.
pub fn mapping_property(family: PropertyFamily, parent: Uuid, data_type: DataType) -> Property {
    let mut p = property(family, PropertyKind::Static, data_type);
    p.parent = Some(parent);
    p
}

#[derive(Default)]
pub struct RecordingPublisher {
    calls: Mutex<Vec<(String, RoutingKey, Option<ActionPayload>)>>,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<(String, RoutingKey, Option<ActionPayload>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExchangePublisher for RecordingPublisher {
    async fn publish(
        &self,
        source: &str,
        routing_key: RoutingKey,
        data: Option<&ActionPayload>,
    ) -> ExchangeResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_string(), routing_key, data.cloned()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingClient {
    frames: Mutex<Vec<Vec<u8>>>,
    sent: AtomicUsize,
    /// Sends fail once this many frames went through.
    fail_after: Option<usize>,
}

impl RecordingClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_after(count: usize) -> Arc<Self> {
        Arc::new(Self {
            fail_after: Some(count),
            ..Self::default()
        })
    }

    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExchangeClient for RecordingClient {
    async fn send(&self, frame: &[u8]) -> BridgeResult<()> {
        let sent = self.sent.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after {
            if sent >= limit {
                return Err("connection lost".into());
            }
        }
        self.frames.lock().unwrap().push(frame.to_vec());
        Ok(())
    }
}

pub struct StaticTopic(pub String);

impl Topic for StaticTopic {
    fn id(&self) -> &str {
        &self.0
    }
}

/// Decode a WAMP-style event frame into (frame code, topic id, payload).
pub fn decode_frame(frame: &[u8]) -> (u8, String, Value) {
    let (code, topic, inner): (u8, String, String) =
        serde_json::from_slice(frame).expect("outer frame");
    let payload = serde_json::from_str(&inner).expect("inner payload");
    (code, topic, payload)
}

pub struct Harness {
    pub repository: Arc<InMemoryPropertyRepository>,
    pub connector_store: Arc<InMemoryStateStore>,
    pub device_store: Arc<InMemoryStateStore>,
    pub channel_store: Arc<InMemoryStateStore>,
    pub publisher: Arc<RecordingPublisher>,
    pub gateway: Arc<ExchangeGateway>,
}

impl Harness {
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryPropertyRepository::new());
        let connector_store = Arc::new(InMemoryStateStore::new());
        let device_store = Arc::new(InMemoryStateStore::new());
        let channel_store = Arc::new(InMemoryStateStore::new());
        let stores = ExchangeStores::new(
            Arc::clone(&connector_store) as _,
            Arc::clone(&device_store) as _,
            Arc::clone(&channel_store) as _,
        );
        let publisher = RecordingPublisher::new();
        let gateway = Arc::new(ExchangeGateway::new(
            &Settings::default(),
            Arc::clone(&repository) as _,
            stores,
            Some(Arc::clone(&publisher) as _),
        ));
        Self {
            repository,
            connector_store,
            device_store,
            channel_store,
            publisher,
            gateway,
        }
    }

    pub fn store_for(&self, family: PropertyFamily) -> &Arc<InMemoryStateStore> {
        match family {
            PropertyFamily::Connector => &self.connector_store,
            PropertyFamily::Device => &self.device_store,
            PropertyFamily::Channel => &self.channel_store,
        }
    }
}

pub fn envelope(routing_key: &str, source: &str, data: Option<Value>) -> ActionMessage {
    ActionMessage {
        routing_key: Some(routing_key.to_string()),
        source: Some(source.to_string()),
        data,
    }
}
