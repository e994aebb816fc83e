//! Region documents
//!
//! The JSON file the CLI reads regions (and optionally a selection) from:
//!
//! ```json
//! {
//!   "selection": { "in_time": 0.0, "out_time": 4.0 },
//!   "regions": [
//!     { "start": 0.5, "end": 1.0, "action": "cut" },
//!     { "start": 2.0, "end": 2.5, "action": "mute" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::edit::{RegionSet, Selection};
use crate::error::{BakeError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionDocument {
    #[serde(default)]
    pub selection: Option<Selection>,
    #[serde(default)]
    pub regions: RegionSet,
}

impl RegionDocument {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BakeError::FileNotFound {
                path: path.display().to_string(),
                source: None,
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
