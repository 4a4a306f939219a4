use crate::{
    dispatch::ActionDispatcher,
    publisher::ExchangePublisher,
    resolver::{PropertyRepository, PropertyResolver},
    snapshot::{ExchangeClient, SnapshotPublisher, Topic},
    store::ExchangeStores,
};
use statebridge_error::ExchangeResult;
use statebridge_models::{Acknowledgement, ActionMessage, Settings};
use std::sync::Arc;

/// Facade wiring the command and subscription paths over one set of
/// collaborators. The transport layer calls [`Self::handle_message`] for
/// command events and [`Self::on_subscribe`] for subscribe events.
pub struct ExchangeGateway {
    dispatcher: ActionDispatcher,
    snapshot: SnapshotPublisher,
}

impl ExchangeGateway {
    pub fn new(
        settings: &Settings,
        repository: Arc<dyn PropertyRepository>,
        stores: ExchangeStores,
        publisher: Option<Arc<dyn ExchangePublisher>>,
    ) -> Self {
        let resolver = PropertyResolver::new(Arc::clone(&repository));
        Self {
            dispatcher: ActionDispatcher::new(resolver, stores.clone(), publisher),
            snapshot: SnapshotPublisher::new(
                repository,
                stores,
                settings.general.module_source.clone(),
            ),
        }
    }

    pub async fn handle_message(
        &self,
        message: &ActionMessage,
    ) -> ExchangeResult<Acknowledgement> {
        self.dispatcher.handle(message).await
    }

    pub async fn on_subscribe(&self, client: &dyn ExchangeClient, topic: &dyn Topic) {
        self.snapshot.on_subscribe(client, topic).await
    }
}
