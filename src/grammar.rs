//! Textual mapping specs and resolve-by-existence.
//!
//! A spec is a `;`-separated list of chunks. A chunk is either a
//! `source:destination` pair or a `,`-separated list of candidate paths of
//! which exactly one exists on disk; the others are mapped to it.

use crate::error::{DirmapError, Result};
use crate::remap::PrefixRemapper;
use std::collections::BTreeSet;
use std::path::Path;

/// One parsed chunk of a mapping spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecEntry {
	/// An explicit `source:destination` pair.
	Pair { source: String, destination: String },

	/// Candidates to be resolved against the filesystem.
	Existing(Vec<String>),
}

/// Parse a mapping spec. Performs no I/O and no path validation.
pub fn parse_spec(input: &str) -> Result<Vec<SpecEntry>> {
	let mut entries = Vec::new();

	for chunk in input.split(';') {
		if chunk.is_empty() {
			continue;
		}

		if chunk.contains(',') {
			entries.push(SpecEntry::Existing(
				chunk.split(',').map(str::to_string).collect(),
			));
			continue;
		}

		let mut parts = chunk.split(':');
		match (parts.next(), parts.next(), parts.next()) {
			(Some(source), Some(destination), None) => entries.push(SpecEntry::Pair {
				source: source.to_string(),
				destination: destination.to_string(),
			}),
			_ => {
				return Err(DirmapError::MalformedEntry {
					entry: chunk.to_string(),
				});
			}
		}
	}

	Ok(entries)
}

/// Pick the single existing candidate and map every other candidate to it.
///
/// Returns `(destination, sources)`. Fails unless there are at least two
/// distinct candidates and exactly one of them satisfies `exists`.
pub fn resolve_existing<S, F>(candidates: &[S], exists: F) -> Result<(String, Vec<String>)>
where
	S: AsRef<str>,
	F: Fn(&str) -> bool,
{
	let unique: BTreeSet<&str> = candidates.iter().map(AsRef::as_ref).collect();
	let ambiguous = |existing: usize| DirmapError::AmbiguousExistence {
		candidates: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
		existing,
	};

	let (present, absent): (Vec<&str>, Vec<&str>) =
		unique.iter().copied().partition(|candidate| exists(*candidate));

	if unique.len() < 2 {
		return Err(ambiguous(present.len()));
	}

	match present.as_slice() {
		[destination] => Ok((
			destination.to_string(),
			absent.into_iter().map(str::to_string).collect(),
		)),
		_ => Err(ambiguous(present.len())),
	}
}

fn path_exists(candidate: &str) -> bool {
	Path::new(candidate).exists()
}

impl PrefixRemapper {
	/// Parse `input` as a mapping spec and store every entry.
	///
	/// Nothing is stored if any chunk is malformed, ambiguous or invalid.
	pub fn add_str(&mut self, input: &str) -> Result<()> {
		let entries = parse_spec(input)?;
		self.add_spec_entries(&entries)
	}

	/// Map every candidate that does not exist to the one that does.
	pub fn add_existing<S: AsRef<str>>(&mut self, candidates: &[S]) -> Result<()> {
		self.add_existing_with(candidates, path_exists)
	}

	/// Like [`Self::add_existing`] with a caller-supplied existence check.
	pub fn add_existing_with<S, F>(&mut self, candidates: &[S], exists: F) -> Result<()>
	where
		S: AsRef<str>,
		F: Fn(&str) -> bool,
	{
		let (destination, sources) = resolve_existing(candidates, exists)?;
		self.add_batch(sources.into_iter().map(|source| (source, destination.clone())))
	}

	/// Store parsed spec entries, resolving candidate lists against the
	/// filesystem.
	pub fn add_spec_entries(&mut self, entries: &[SpecEntry]) -> Result<()> {
		self.add_spec_entries_with(entries, path_exists)
	}

	/// Like [`Self::add_spec_entries`] with a caller-supplied existence check.
	pub fn add_spec_entries_with<F>(&mut self, entries: &[SpecEntry], exists: F) -> Result<()>
	where
		F: Fn(&str) -> bool,
	{
		let mut pairs = Vec::new();

		for entry in entries {
			match entry {
				SpecEntry::Pair {
					source,
					destination,
				} => pairs.push((source.clone(), destination.clone())),
				SpecEntry::Existing(candidates) => {
					let (destination, sources) = resolve_existing(candidates.as_slice(), &exists)?;
					pairs.extend(sources.into_iter().map(|source| (source, destination.clone())));
				}
			}
		}

		self.add_batch(pairs)
	}
}
