//! Pressroom library modules.
//!
//! The binary wires these together; integration tests build the same page
//! router over in-memory stores.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
