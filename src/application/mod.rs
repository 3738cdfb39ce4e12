//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on host boundary traits.

pub mod diagnostics;
pub mod error;
pub mod fanin;
pub mod services;

pub use diagnostics::Diagnostics;
pub use error::{ApplicationError, ApplicationResult};
pub use fanin::fan_in;
