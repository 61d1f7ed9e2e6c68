//! Writer configuration: path prefixes and differ settings, loadable with serde.

use serde::{Deserialize, Serialize};

use crate::engine::DifferConfig;

/// Configuration for a [`PatchWriter`](crate::PatchWriter).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Prefix joined with the old side's path in headers.
    pub src_prefix: String,
    /// Prefix joined with the new side's path in headers.
    pub dst_prefix: String,
    /// Settings for the bundled line differ.
    pub differ: DifferConfig,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            src_prefix: "a/".into(),
            dst_prefix: "b/".into(),
            differ: DifferConfig::default(),
        }
    }
}

impl PatchConfig {
    /// Headers show bare object paths, like `git diff --no-prefix`.
    pub fn no_prefix() -> Self {
        Self {
            src_prefix: String::new(),
            dst_prefix: String::new(),
            ..Default::default()
        }
    }
}
