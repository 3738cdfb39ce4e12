//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no document, no renderer, no config loading).

pub mod classify;
pub mod entities;
pub mod error;
pub mod ids;
pub mod ordering;
pub mod record;
pub mod toggle;

pub use classify::{partition_by_enddate, Partition};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use ids::IdAllocator;
pub use ordering::{compare_by_term_then_text, compare_by_text, sort_for_group};
pub use record::{DataRecord, DataValue, Markup};
pub use toggle::{ToggleEvent, ToggleState};
