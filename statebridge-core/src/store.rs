use async_trait::async_trait;
use statebridge_error::StoreResult;
use statebridge_models::{Property, PropertyFamily, PropertyState, StateFields};
use std::sync::Arc;

/// Read and write access to property runtime state.
///
/// `create_state` fails when a record already exists; callers are expected to
/// check with `find_state` first. `update_state` refreshes `updated_at` on
/// every write. The writable field set is restricted to
/// `{actual_value, expected_value, pending, valid}` by [`StateFields`].
#[async_trait]
pub trait PropertyStateStore: Send + Sync {
    /// Current state for a property, if one was ever created. Pure read.
    async fn find_state(&self, property: &Property) -> StoreResult<Option<PropertyState>>;

    /// Create the first state record for a property.
    async fn create_state(
        &self,
        property: &Property,
        fields: StateFields,
    ) -> StoreResult<PropertyState>;

    /// Update an existing state record.
    async fn update_state(
        &self,
        property: &Property,
        existing: &PropertyState,
        fields: StateFields,
    ) -> StoreResult<PropertyState>;
}

/// One state store per property family, wired at startup.
#[derive(Clone)]
pub struct ExchangeStores {
    connector: Arc<dyn PropertyStateStore>,
    device: Arc<dyn PropertyStateStore>,
    channel: Arc<dyn PropertyStateStore>,
}

impl ExchangeStores {
    pub fn new(
        connector: Arc<dyn PropertyStateStore>,
        device: Arc<dyn PropertyStateStore>,
        channel: Arc<dyn PropertyStateStore>,
    ) -> Self {
        Self {
            connector,
            device,
            channel,
        }
    }

    pub fn for_family(&self, family: PropertyFamily) -> &Arc<dyn PropertyStateStore> {
        match family {
            PropertyFamily::Connector => &self.connector,
            PropertyFamily::Device => &self.device,
            PropertyFamily::Channel => &self.channel,
        }
    }
}
