use crate::error::{PathRole, Result};
use crate::remap::engine::{EngineKind, MatchIndex};
use crate::remap::path::{self, DEFAULT_SEPARATOR};
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::collections::btree_map;
use tracing::{debug, trace};

/// A single source → destination pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MappingEntry {
	/// Absolute, normalized prefix to match.
	pub source: String,

	/// Absolute, normalized prefix to substitute.
	pub destination: String,
}

impl MappingEntry {
	pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
		MappingEntry {
			source: source.into(),
			destination: destination.into(),
		}
	}
}

/// Remaps directories from one layout to another.
///
/// Useful for systematically translating paths from one environment to another
/// in which volumes are mounted differently, or directories otherwise moved.
///
/// ```
/// use dirmap_cli::remap::PrefixRemapper;
///
/// let mut dirmap = PrefixRemapper::new();
/// dirmap.add_mapping("/src", "/dst").unwrap();
/// assert_eq!(dirmap.remap("/src/something").unwrap(), "/dst/something");
/// ```
///
/// Sources are unique; adding a source again replaces its destination. The
/// match index is rebuilt on the first query after a mutation.
#[derive(Debug)]
pub struct PrefixRemapper {
	entries: BTreeMap<String, String>,
	separator: char,
	engine: EngineKind,
	index: Mutex<Option<Box<dyn MatchIndex>>>,
}

impl Default for PrefixRemapper {
	fn default() -> Self {
		Self::new()
	}
}

impl Clone for PrefixRemapper {
	fn clone(&self) -> Self {
		PrefixRemapper {
			entries: self.entries.clone(),
			separator: self.separator,
			engine: self.engine,
			index: Mutex::new(None),
		}
	}
}

impl PrefixRemapper {
	/// An empty remapper using the default engine and `/` as separator.
	pub fn new() -> Self {
		PrefixRemapper {
			entries: BTreeMap::new(),
			separator: DEFAULT_SEPARATOR,
			engine: EngineKind::default(),
			index: Mutex::new(None),
		}
	}

	/// An empty remapper using the given engine and `/` as separator.
	pub fn with_engine(engine: EngineKind) -> Self {
		PrefixRemapper {
			engine,
			..Self::new()
		}
	}

	/// An empty remapper with an explicit engine and separator.
	pub fn with_options(engine: EngineKind, separator: char) -> Result<Self> {
		Ok(PrefixRemapper {
			engine,
			separator: path::validate_separator(separator)?,
			..Self::new()
		})
	}

	/// A remapper holding `pairs`, using the default engine.
	pub fn from_pairs<I, S, D>(pairs: I) -> Result<Self>
	where
		I: IntoIterator<Item = (S, D)>,
		S: Into<String>,
		D: Into<String>,
	{
		let mut remapper = Self::new();
		remapper.add_batch(pairs)?;
		Ok(remapper)
	}

	pub fn engine(&self) -> EngineKind {
		self.engine
	}

	pub fn separator(&self) -> char {
		self.separator
	}

	/// Number of unique sources.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The destination stored for exactly `source`.
	pub fn get(&self, source: &str) -> Option<&str> {
		self.entries.get(source).map(String::as_str)
	}

	pub fn contains_source(&self, source: &str) -> bool {
		self.entries.contains_key(source)
	}

	/// All stored `(source, destination)` pairs, ordered by source.
	pub fn iter(&self) -> Iter<'_> {
		Iter(self.entries.iter())
	}

	/// Store a mapping, replacing any previous destination for `source`.
	///
	/// Both paths must be absolute and normalized. On error nothing is stored.
	pub fn add_mapping(
		&mut self,
		source: impl Into<String>,
		destination: impl Into<String>,
	) -> Result<()> {
		let entry = self.validated(source.into(), destination.into())?;
		self.insert(entry);
		Ok(())
	}

	/// Store every pair in `pairs`.
	///
	/// All pairs are validated before any is stored, so a failing batch leaves
	/// the remapper unchanged. Later pairs win over earlier ones for the same
	/// source.
	pub fn add_batch<I, S, D>(&mut self, pairs: I) -> Result<()>
	where
		I: IntoIterator<Item = (S, D)>,
		S: Into<String>,
		D: Into<String>,
	{
		let validated = pairs
			.into_iter()
			.map(|(source, destination)| self.validated(source.into(), destination.into()))
			.collect::<Result<Vec<_>>>()?;

		for entry in validated {
			self.insert(entry);
		}
		Ok(())
	}

	/// Store every entry in `entries`, with the same guarantees as [`Self::add_batch`].
	pub fn add_entries<I>(&mut self, entries: I) -> Result<()>
	where
		I: IntoIterator<Item = MappingEntry>,
	{
		self.add_batch(
			entries
				.into_iter()
				.map(|entry| (entry.source, entry.destination)),
		)
	}

	/// Rewrite `path` using the most specific mapping whose source is an
	/// ancestor of (or equal to) `path`.
	///
	/// Unmapped paths come back unchanged. `path` must be absolute and
	/// normalized.
	pub fn remap(&self, path: &str) -> Result<String> {
		path::validate(path, PathRole::Query, self.separator)?;

		let mut index = self.index.lock();
		if index.is_none() {
			let built = self.engine.build(&self.entries, self.separator)?;
			debug!(
				engine = %self.engine,
				entries = self.entries.len(),
				"Rebuilt match index"
			);
			*index = Some(built);
		}

		let rewritten = index
			.as_ref()
			.and_then(|index| index.longest_match(path))
			.map(|m| m.rewrite(self.separator));

		Ok(rewritten.unwrap_or_else(|| path.to_string()))
	}

	/// Alias for [`Self::remap`].
	pub fn lookup(&self, path: &str) -> Result<String> {
		self.remap(path)
	}

	fn validated(&self, source: String, destination: String) -> Result<MappingEntry> {
		path::validate(&source, PathRole::Source, self.separator)?;
		path::validate(&destination, PathRole::Destination, self.separator)?;
		Ok(MappingEntry {
			source,
			destination,
		})
	}

	fn insert(&mut self, entry: MappingEntry) {
		match self.entries.insert(entry.source.clone(), entry.destination) {
			Some(previous) => trace!(source = %entry.source, %previous, "Replaced mapping"),
			None => trace!(source = %entry.source, "Added mapping"),
		}
		*self.index.get_mut() = None;
	}
}

/// Iterator over the `(source, destination)` pairs of a [`PrefixRemapper`].
#[derive(Debug, Clone)]
pub struct Iter<'a>(btree_map::Iter<'a, String, String>);

impl<'a> Iterator for Iter<'a> {
	type Item = (&'a str, &'a str);

	fn next(&mut self) -> Option<Self::Item> {
		self.0
			.next()
			.map(|(source, destination)| (source.as_str(), destination.as_str()))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.0.size_hint()
	}
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a PrefixRemapper {
	type Item = (&'a str, &'a str);
	type IntoIter = Iter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
