//! Prefix remapping for dirmap.
//!
//! This module handles:
//! - Path validation and boundary-aware prefix stripping
//! - Interchangeable match indexes (sorted scan, segment trie, regex)
//! - The `PrefixRemapper` that owns mappings and answers queries

pub mod engine;
pub mod path;
pub mod pattern;
pub mod remapper;
pub mod scan;
pub mod trie;

pub use engine::{EngineKind, Match, MatchIndex};
pub use path::{DEFAULT_SEPARATOR, is_clean};
pub use remapper::{Iter, MappingEntry, PrefixRemapper};
