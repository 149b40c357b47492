//! Messenger abstractions: the incoming update model and the outbound port.

pub mod port;
pub mod types;
