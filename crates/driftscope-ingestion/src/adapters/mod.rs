//! # Dataset Source Adapters
//!
//! Thin loaders that turn an external record store into a [`Dataset`].
//!
//! - **json**: a JSON array of records on disk
//! - **memory**: records already held by the caller (tests, embedding hosts)

pub mod json;
pub mod memory;

pub use json::JsonFileSource;
pub use memory::InMemorySource;

use crate::dataset::Dataset;
use driftscope_core::Result;

/// Common trait for all dataset sources
pub trait DatasetSource {
    /// Source name for logging
    fn name(&self) -> &'static str;

    /// Load the full record collection
    fn load(&self) -> Result<Dataset>;
}
