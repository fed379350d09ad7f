//! Core types shared across the broker
//!
//! Error taxonomy and the response shape every inbound operation resolves to.

pub mod error;
pub mod response;

pub use error::{BrokerError, BrokerResult};
pub use response::BrokerResponse;
