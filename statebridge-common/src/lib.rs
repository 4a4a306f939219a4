//! Shared runtime concerns for the statebridge gateway: logging bootstrap.

mod logger;

pub use logger::Logger;
