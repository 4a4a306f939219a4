use async_trait::async_trait;
use statebridge_error::ExchangeResult;
use statebridge_models::{ActionPayload, RoutingKey};
use tracing::trace;

/// Seam to the outbound message bus.
///
/// Implementations forward a validated, routed command to the rest of the
/// system. The dispatcher treats publishing as fire-and-forget.
#[async_trait]
pub trait ExchangePublisher: Send + Sync {
    async fn publish(
        &self,
        source: &str,
        routing_key: RoutingKey,
        data: Option<&ActionPayload>,
    ) -> ExchangeResult<()>;
}

/// Default publisher used when no message bus is configured.
#[derive(Debug, Default)]
pub struct NoopPublisher;

#[async_trait]
impl ExchangePublisher for NoopPublisher {
    async fn publish(
        &self,
        source: &str,
        routing_key: RoutingKey,
        _data: Option<&ActionPayload>,
    ) -> ExchangeResult<()> {
        trace!("dropping {routing_key} message from {source}: no publisher configured");
        Ok(())
    }
}
