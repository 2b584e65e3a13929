//! Resource cost accounting.

use serde::{Deserialize, Serialize};

/// Accumulated resource usage of an operation.
///
/// CPU and IO units add up across steps; peak memory keeps the maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub cpu: u64,
    pub io: u64,
    pub peak_memory: u64,
}

impl Cost {
    /// Folds `other` into `self`.
    pub fn merge(&mut self, other: Cost) {
        self.cpu += other.cpu;
        self.io += other.io;
        self.peak_memory = self.peak_memory.max(other.peak_memory);
    }
}
