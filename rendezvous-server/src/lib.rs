pub mod config;
pub mod http;
pub mod registry;
pub mod router;
pub mod signaling;

pub use config::*;
pub use http::*;
pub use registry::*;
pub use router::*;
pub use signaling::*;
