// Constants shared across the statebridge workspace.

/// The default configuration file name for the gateway.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "statebridge.toml";

/// WAMP-style frame code for outbound subscription events.
///
/// Snapshot events are framed as `[EVENT_FRAME, topic_id, payload_json]`.
pub const EVENT_FRAME: u8 = 8;

/// Module source identifier attached to snapshot events when settings do not
/// override it.
pub const DEFAULT_MODULE_SOURCE: &str = "devices-module";

/// Source tag used in structured log records emitted by the exchange core.
pub const LOG_SOURCE: &str = "exchange-gateway";
