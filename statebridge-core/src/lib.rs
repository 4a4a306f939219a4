//! Exchange core for the statebridge gateway.
//!
//! Bridges connected publish/subscribe clients to the property-state store
//! and the outbound message bus:
//!
//! - **Command path**: [`ActionDispatcher`] validates inbound command
//!   messages, applies the controlled state mutation for "set" commands and
//!   forwards every admitted command downstream.
//! - **Subscription path**: [`SnapshotPublisher`] pushes a full snapshot of
//!   current property states to a freshly subscribed client.
//!
//! The transport protocol, the production storage engine and the message bus
//! stay external; this crate only defines their seams.

mod dispatch;
mod gateway;
mod memory;
mod publisher;
mod resolver;
mod snapshot;
mod store;
mod validator;

pub use dispatch::ActionDispatcher;
pub use gateway::ExchangeGateway;
pub use memory::{InMemoryPropertyRepository, InMemoryStateStore};
pub use publisher::{ExchangePublisher, NoopPublisher};
pub use resolver::{PropertyRepository, PropertyResolver};
pub use snapshot::{event_frame, ExchangeClient, SnapshotPublisher, Topic};
pub use store::{ExchangeStores, PropertyStateStore};
pub use validator::DataValidator;
