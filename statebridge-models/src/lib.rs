//! Domain model for the statebridge exchange gateway.
//!
//! This crate carries the wire-facing and store-facing types shared by the
//! exchange core: properties and their runtime state, routing keys and their
//! payload schemas, the inbound message envelope, value normalization, and
//! gateway settings.

pub mod constants;
pub mod message;
pub mod payload;
pub mod property;
pub mod routing;
pub mod settings;
pub mod state;
pub mod value;

pub use message::{Acknowledgement, ActionMessage};
pub use payload::{
    ActionKind, ActionPayload, ChannelActionPayload, ChannelPropertyActionPayload,
    ConnectorActionPayload, DeviceActionPayload, DevicePropertyActionPayload, TriggerActionPayload,
};
pub use property::{Property, PropertyFamily, PropertyKind};
pub use routing::{PayloadSchema, RoutingKey};
pub use settings::Settings;
pub use state::{PropertyState, StateFields};
pub use value::{normalize_value, DataType, ValueFormat};
