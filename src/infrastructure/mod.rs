//! Infrastructure layer: host port implementations and DI container
//!
//! This layer implements the document, renderer and clock boundary traits and wires up services.

pub mod di;
pub mod document;
pub mod error;
pub mod renderer;
pub mod snapshot;
pub mod traits;

pub use document::MemoryDocument;
pub use error::{InfraError, InfraResult};
pub use renderer::ListItemRenderer;
pub use snapshot::{load_snapshot, Snapshot};
