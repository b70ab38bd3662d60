mod connection_registry;
mod participant;

pub use connection_registry::*;
pub use participant::*;
