//! Adapters around the bookstore core.

pub mod inbound;
pub mod outbound;
