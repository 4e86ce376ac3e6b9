//! Transport layer
//!
//! Command connections are consumed through the `TransportListener` and
//! `TransportStream` traits; TCP is the only backend.

pub mod tcp;
pub mod traits;

pub use tcp::TcpTransportListener;
pub use traits::{TransportListener, TransportStream};
