use crate::error::{DirmapError, Result};
use crate::remap::path::join;
use crate::remap::pattern::CompiledPatterns;
use crate::remap::scan::SortedScan;
use crate::remap::trie::SegmentTrie;
use serde::Deserialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The longest stored source that is a directory-boundary prefix of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'i, 'p> {
	/// The stored source prefix.
	pub source: &'i str,

	/// The destination mapped to `source`.
	pub destination: &'i str,

	/// What is left of the queried path after the source and its separator.
	/// Empty on an exact match.
	pub remainder: &'p str,
}

impl Match<'_, '_> {
	/// Build the rewritten path.
	pub fn rewrite(&self, separator: char) -> String {
		join(self.destination, self.remainder, separator)
	}
}

/// A derived lookup structure built from a set of mappings.
///
/// Every implementation must return the same match for the same input; they
/// only differ in how much work they do at build time versus lookup time.
pub trait MatchIndex: Send + fmt::Debug {
	/// Find the most specific source that is a boundary prefix of `path`.
	///
	/// `path` is always a clean absolute path.
	fn longest_match<'i, 'p>(&'i self, path: &'p str) -> Option<Match<'i, 'p>>;
}

/// Which [`MatchIndex`] implementation a remapper builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
	/// Entries sorted most specific first, scanned linearly.
	#[default]
	Scan,

	/// Sources split into segments and stored in a trie.
	Trie,

	/// One anchored regular expression per source.
	Regex,
}

impl EngineKind {
	/// Every available engine.
	pub const ALL: [EngineKind; 3] = [EngineKind::Scan, EngineKind::Trie, EngineKind::Regex];

	pub fn as_str(&self) -> &'static str {
		match self {
			EngineKind::Scan => "scan",
			EngineKind::Trie => "trie",
			EngineKind::Regex => "regex",
		}
	}

	/// Build an index of this kind over `entries`.
	pub fn build(
		self,
		entries: &BTreeMap<String, String>,
		separator: char,
	) -> Result<Box<dyn MatchIndex>> {
		let index: Box<dyn MatchIndex> = match self {
			EngineKind::Scan => Box::new(SortedScan::build(entries, separator)),
			EngineKind::Trie => Box::new(SegmentTrie::build(entries, separator)),
			EngineKind::Regex => Box::new(CompiledPatterns::build(entries, separator)?),
		};
		Ok(index)
	}
}

impl fmt::Display for EngineKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for EngineKind {
	type Err = DirmapError;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_lowercase().as_str() {
			"scan" => Ok(EngineKind::Scan),
			"trie" => Ok(EngineKind::Trie),
			"regex" => Ok(EngineKind::Regex),
			_ => Err(DirmapError::UnknownEngine {
				name: s.to_string(),
			}),
		}
	}
}

/// Entries in the order indexes must consider them: longest source first,
/// then source, then destination.
pub(crate) fn by_specificity(entries: &BTreeMap<String, String>) -> Vec<(&str, &str)> {
	let mut ordered: Vec<(&str, &str)> = entries
		.iter()
		.map(|(source, destination)| (source.as_str(), destination.as_str()))
		.collect();
	ordered.sort_by_key(|&(source, destination)| (Reverse(source.len()), source, destination));
	ordered
}
