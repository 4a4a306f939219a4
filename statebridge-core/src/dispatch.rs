use crate::{
    publisher::{ExchangePublisher, NoopPublisher},
    resolver::PropertyResolver,
    store::ExchangeStores,
    validator::DataValidator,
};
use dashmap::DashMap;
use statebridge_error::{exchange::ExchangeError, ExchangeResult};
use statebridge_models::{
    constants::LOG_SOURCE, Acknowledgement, ActionKind, ActionMessage, PropertyFamily, RoutingKey,
    StateFields,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

/// Consumes inbound command messages.
///
/// One message runs through a fixed sequence: envelope check, routing-key
/// admission, payload validation, the optional "set" state mutation, and
/// finally the downstream publish. Validation and any mutation complete
/// strictly before the publish; a failure anywhere up to the mutation
/// prevents the publish from firing at all.
pub struct ActionDispatcher {
    resolver: PropertyResolver,
    stores: ExchangeStores,
    validator: DataValidator,
    publisher: Arc<dyn ExchangePublisher>,
    /// Per-property guards serializing the check-then-write of the "set"
    /// path; without them two concurrent set commands for the same property
    /// can race into a duplicate create or a lost update.
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl ActionDispatcher {
    pub fn new(
        resolver: PropertyResolver,
        stores: ExchangeStores,
        publisher: Option<Arc<dyn ExchangePublisher>>,
    ) -> Self {
        Self {
            resolver,
            stores,
            validator: DataValidator::new(),
            publisher: publisher.unwrap_or_else(|| Arc::new(NoopPublisher)),
            locks: DashMap::new(),
        }
    }

    /// Handle one inbound command message.
    ///
    /// Returns the fixed optimistic acknowledgement; downstream publish
    /// success is deliberately not awaited for confirmation and does not
    /// affect the acknowledgement.
    pub async fn handle(&self, message: &ActionMessage) -> ExchangeResult<Acknowledgement> {
        let (Some(routing_key), Some(source)) =
            (message.routing_key.as_deref(), message.source.as_deref())
        else {
            return Err(ExchangeError::InvalidMessage);
        };

        let key: RoutingKey = routing_key
            .parse()
            .map_err(ExchangeError::UnsupportedRoutingKey)?;
        if !key.is_action() {
            return Err(ExchangeError::UnsupportedRoutingKey(routing_key.to_string()));
        }

        let data = match &message.data {
            Some(raw) => Some(self.validator.validate(raw, key)?),
            None => None,
        };

        if let Some(payload) = &data {
            if payload.action() == ActionKind::Set {
                if let Some((family, property_id)) = payload.property_target() {
                    self.apply_set(family, property_id, payload.expected_value())
                        .await?;
                }
            }
        }

        if let Err(e) = self.publisher.publish(source, key, data.as_ref()).await {
            // The acknowledgement is optimistic: a failed forward is logged
            // and left to the bus side to recover.
            warn!(
                source = LOG_SOURCE,
                r#type = "publish",
                code = e.code(),
                "Message could not be forwarded to the exchange bus: {e}"
            );
        }

        Ok(Acknowledgement::accepted())
    }

    /// The only state mutation this core performs: record the new expected
    /// value with the pending flag raised, creating the state on first use.
    async fn apply_set(
        &self,
        family: PropertyFamily,
        property_id: Uuid,
        expected_value: Option<&str>,
    ) -> ExchangeResult<()> {
        let property = self.resolver.resolve(family, property_id).await?;
        if !PropertyResolver::supports_dynamic_state(&property) {
            return Err(ExchangeError::NotControllable(property.id));
        }

        let store = self.stores.for_family(family);
        let lock = self
            .locks
            .entry(property.id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let _guard = lock.lock().await;

        let fields = StateFields::expected(expected_value.map(str::to_string));
        match store.find_state(&property).await? {
            None => {
                store.create_state(&property, fields).await?;
            }
            Some(existing) => {
                store.update_state(&property, &existing, fields).await?;
            }
        }
        Ok(())
    }
}
