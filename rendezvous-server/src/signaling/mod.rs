mod event_sink;
mod signaling_service;
mod ws_handler;

pub use event_sink::*;
pub use signaling_service::*;
pub use ws_handler::*;
