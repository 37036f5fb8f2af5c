//! # Driftscope Core
//!
//! Shared building blocks for the driftscope workspace.
//!
//! This crate provides:
//! - Domain types for PSI results and histogram bins
//! - The error taxonomy used by every library crate
//! - Layered configuration (YAML file plus environment overrides)

#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::types::{BinningMethod, DriftType, HistogramBin, PsiResult, StatusTier};
}
