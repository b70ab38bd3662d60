mod event_router;
mod observer;
mod session_state;

pub use event_router::*;
pub use observer::*;
pub use session_state::*;
