use crate::error::{DirmapError, PathRole, Result};
use crate::grammar::SpecEntry;
use crate::remap::{EngineKind, MappingEntry};
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.dirmap.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop directory cascade and jump directly to ~/.dirmap.toml.
	#[serde(default)]
	pub root: bool,

	/// Environment variable name that, if truthy, skips ~/.dirmap.toml lookup.
	/// Useful for CI environments.
	#[serde(default)]
	pub root_config_lookup_disable_env_var: Option<String>,

	/// Path separator. Must be a single character.
	#[serde(default)]
	pub separator: Option<String>,

	/// Which match index to build.
	#[serde(default)]
	pub engine: Option<EngineKind>,

	/// Inline mapping spec, e.g. `"/src:/dst;/old,/new"`.
	#[serde(default)]
	pub map: Option<String>,

	/// Explicit source/destination tables.
	#[serde(default)]
	pub mappings: Vec<MappingEntry>,

	/// Candidate lists resolved by which path exists on disk.
	#[serde(default)]
	pub existing: Vec<Vec<String>>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// Mapping sources from all configs, least specific first so later
	/// entries win.
	pub sources: Vec<MappingSource>,

	/// Separator from the most specific config that sets one.
	pub separator: Option<char>,

	/// Engine from the most specific config that sets one.
	pub engine: Option<EngineKind>,
}

/// One config's mapping contributions, tagged with where they came from.
#[derive(Debug, Clone)]
pub struct MappingSource {
	pub map: Option<String>,
	pub mappings: Vec<MappingEntry>,
	pub existing: Vec<Vec<String>>,

	/// The config file these came from.
	pub path: PathBuf,
}

impl Config {
	/// The configured separator as a single character.
	pub fn separator_char(&self) -> Result<Option<char>> {
		let Some(ref separator) = self.separator else {
			return Ok(None);
		};

		let mut chars = separator.chars();
		match (chars.next(), chars.next()) {
			(Some(c), None) => crate::remap::path::validate_separator(c).map(Some),
			_ => Err(DirmapError::InvalidSeparator {
				separator: separator.clone(),
			}),
		}
	}

	/// Check everything that can be checked without touching the filesystem.
	pub fn validate(&self) -> Result<()> {
		let separator = self
			.separator_char()?
			.unwrap_or(crate::remap::DEFAULT_SEPARATOR);

		check_shapes(&self.mappings, self.map.as_deref(), &self.existing, separator)
	}

	/// Number of explicit mapping entries, for display.
	pub fn mapping_count(&self) -> usize {
		self.mappings.len() + self.existing.len()
	}
}

impl MergedConfig {
	/// Check every source against the separator the remapper will use.
	///
	/// Each file is validated against its own separator when it is parsed, but
	/// a nearer file may set a different one.
	pub fn validate(&self) -> Result<()> {
		let separator = self.separator.unwrap_or(crate::remap::DEFAULT_SEPARATOR);

		for source in &self.sources {
			check_shapes(
				&source.mappings,
				source.map.as_deref(),
				&source.existing,
				separator,
			)
			.map_err(|err| DirmapError::ConfigSeparatorMismatch {
				path: source.path.clone(),
				separator,
				source: Box::new(err),
			})?;
		}

		Ok(())
	}
}

/// Check mapping path shapes. Existence lookups are deferred.
fn check_shapes(
	mappings: &[MappingEntry],
	map: Option<&str>,
	existing: &[Vec<String>],
	separator: char,
) -> Result<()> {
	let mut probe = crate::remap::PrefixRemapper::with_options(EngineKind::Scan, separator)?;
	probe.add_entries(mappings.iter().cloned())?;

	let parsed = match map {
		Some(map) => crate::grammar::parse_spec(map)?,
		None => Vec::new(),
	};
	let mut candidate_lists: Vec<&[String]> = existing.iter().map(Vec::as_slice).collect();
	for entry in &parsed {
		match entry {
			SpecEntry::Pair {
				source,
				destination,
			} => probe.add_mapping(source.as_str(), destination.as_str())?,
			SpecEntry::Existing(candidates) => candidate_lists.push(candidates),
		}
	}

	for candidate in candidate_lists.into_iter().flatten() {
		crate::remap::path::validate(candidate, PathRole::Source, separator)?;
	}

	Ok(())
}
