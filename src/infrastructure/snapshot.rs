//! Course snapshot files.
//!
//! A snapshot is a TOML document holding one `init` call's input:
//!
//! ```toml
//! now = 1718000000          # optional, pins the clock
//! current_terms = ["Fall 2024"]
//! past_terms = ["Spring 2023"]
//!
//! [[current]]
//! key = "c101"
//! text = "Linear Algebra"
//! term = "Fall 2024"
//! enddate = 0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{DomainError, DomainResult, MenuInput};
use crate::infrastructure::error::{InfraError, InfraResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Fixed "current time" in epoch seconds; wall clock when absent
    #[serde(default)]
    pub now: Option<i64>,
    #[serde(flatten)]
    pub input: MenuInput,
}

impl Snapshot {
    pub fn parse(content: &str, path: &Path) -> InfraResult<Self> {
        let snapshot: Snapshot = toml::from_str(content).map_err(|e| InfraError::Snapshot {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        snapshot
            .validate()
            .map_err(|e| InfraError::Snapshot {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(snapshot)
    }

    fn validate(&self) -> DomainResult<()> {
        if let Some(now) = self.now {
            if now < 0 {
                return Err(DomainError::InvalidSnapshot(format!(
                    "now must not be negative, got {now}"
                )));
            }
        }
        self.input.validate()
    }
}

/// Read and validate a snapshot file.
pub fn load_snapshot(path: &Path) -> InfraResult<Snapshot> {
    debug!("load_snapshot: {}", path.display());
    let content = std::fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read snapshot {}", path.display()), e))?;
    Snapshot::parse(&content, path)
}
