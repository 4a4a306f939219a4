use crate::{resolver::PropertyRepository, store::ExchangeStores};
use async_trait::async_trait;
use serde_json::{json, Value};
use statebridge_error::BridgeResult;
use statebridge_models::{
    constants::{EVENT_FRAME, LOG_SOURCE},
    Property, PropertyFamily, RoutingKey,
};
use std::sync::Arc;
use tracing::error;

/// A connected subscriber, opaque to this core.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    async fn send(&self, frame: &[u8]) -> BridgeResult<()>;
}

/// The topic a client subscribed to, opaque to this core.
pub trait Topic: Send + Sync {
    fn id(&self) -> &str;
}

/// Encode one outbound subscription event as a WAMP-style frame:
/// `[EVENT_FRAME, topic_id, payload_json]` with the payload carried as an
/// embedded JSON string.
pub fn event_frame(
    topic_id: &str,
    routing_key: RoutingKey,
    source: &str,
    data: Value,
) -> serde_json::Result<Vec<u8>> {
    let payload = serde_json::to_string(&json!({
        "routing_key": routing_key,
        "source": source,
        "data": data,
    }))?;
    serde_json::to_vec(&json!([EVENT_FRAME, topic_id, payload]))
}

/// Pushes a full property-state snapshot to a freshly subscribed client.
pub struct SnapshotPublisher {
    repository: Arc<dyn PropertyRepository>,
    stores: ExchangeStores,
    module_source: String,
}

impl SnapshotPublisher {
    /// Enumeration order of the three family passes. Fixed: clients rely on
    /// devices arriving before channels before connectors.
    const FAMILY_ORDER: [PropertyFamily; 3] = [
        PropertyFamily::Device,
        PropertyFamily::Channel,
        PropertyFamily::Connector,
    ];

    pub fn new(
        repository: Arc<dyn PropertyRepository>,
        stores: ExchangeStores,
        module_source: String,
    ) -> Self {
        Self {
            repository,
            stores,
            module_source,
        }
    }

    /// Send one event per property across all three families.
    ///
    /// Best-effort delivery: any failure during the pass is logged once and
    /// swallowed. Partially sent snapshots are not retried or rolled back,
    /// and the failure is never surfaced to the client.
    pub async fn on_subscribe(&self, client: &dyn ExchangeClient, topic: &dyn Topic) {
        if let Err(e) = self.send_snapshot(client, topic).await {
            error!(
                source = LOG_SOURCE,
                r#type = "subscribe",
                code = "snapshot_failed",
                "State couldn't be sent to subscriber: {e}"
            );
        }
    }

    async fn send_snapshot(
        &self,
        client: &dyn ExchangeClient,
        topic: &dyn Topic,
    ) -> BridgeResult<()> {
        for family in Self::FAMILY_ORDER {
            let reported = RoutingKey::reported_for(family);
            for property in self.repository.list(family).await? {
                let mut data = property.to_exchange();

                if let Some(state_owner) = self.dynamic_target(&property).await? {
                    let store = self.stores.for_family(family);
                    if let Some(state) = store.find_state(&state_owner).await? {
                        // The mapping's own declared type drives coercion,
                        // even when the state belongs to its parent.
                        for (k, v) in state.to_exchange(&property) {
                            data.insert(k, v);
                        }
                    }
                }

                let frame = event_frame(
                    topic.id(),
                    reported,
                    &self.module_source,
                    Value::Object(data),
                )?;
                client.send(&frame).await?;
            }
        }
        Ok(())
    }

    /// The property whose state backs this snapshot entry: the property
    /// itself when dynamic, its parent when the property is a mapping onto a
    /// dynamic parent, none otherwise.
    async fn dynamic_target(
        &self,
        property: &Arc<Property>,
    ) -> BridgeResult<Option<Arc<Property>>> {
        if property.is_dynamic() {
            return Ok(Some(Arc::clone(property)));
        }
        if let Some(parent_id) = property.parent {
            if let Some(parent) = self.repository.find(property.family, parent_id).await? {
                if parent.is_dynamic() {
                    return Ok(Some(parent));
                }
            }
        }
        Ok(None)
    }
}
