//! Service Ports
//!
//! Abstract interfaces for external services.

mod messenger;
mod model_gateway;

pub use messenger::*;
pub use model_gateway::*;
