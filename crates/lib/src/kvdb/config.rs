//! Database configuration.

use std::path::Path;
use std::{fs, io};

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::core::YieldPolicy;

/// Tuning knobs for a [`DB`](super::DB). Every field has a default, so an
/// empty JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Throttling of cancellation checks in transaction contexts.
    pub yield_policy: YieldPolicy,
    /// Delta depth at which an open transaction flattens its working value.
    ///
    /// `None` keeps the full chain until commit.
    pub compact_threshold: Option<usize>,
}

impl DbConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads the configuration from a JSON file.
    ///
    /// If the file does not exist, the default configuration is returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        match fs::read_to_string(path.as_ref()) {
            Ok(json) => Self::from_json(&json),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }
}
