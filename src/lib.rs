//! Dirmap - remap filesystem paths from one directory layout to another.
//!
//! This library provides the core functionality for dirmap, including:
//! - Longest-prefix path remapping with interchangeable match engines
//! - A compact textual mapping syntax and resolve-by-existence helpers
//! - Cycle-preserving remapping of nested values
//! - Configuration file parsing and cascade discovery
//!
//! # Example
//!
//! ```
//! use dirmap_cli::remap::PrefixRemapper;
//!
//! let mut dirmap = PrefixRemapper::new();
//! dirmap.add_str("/src:/dst;/src/inner:/dst2/inner").unwrap();
//!
//! assert_eq!(dirmap.remap("/src/another").unwrap(), "/dst/another");
//! assert_eq!(dirmap.remap("/src/inner/x").unwrap(), "/dst2/inner/x");
//! assert_eq!(dirmap.remap("/elsewhere").unwrap(), "/elsewhere");
//! ```

pub mod config;
pub mod deep;
pub mod error;
pub mod grammar;
pub mod remap;

pub use error::{DirmapError, Result};
pub use remap::{EngineKind, MappingEntry, PrefixRemapper};
