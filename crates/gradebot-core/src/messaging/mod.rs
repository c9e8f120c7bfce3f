//! Messenger abstractions: the inbound update model and the outbound port.

pub mod port;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;
