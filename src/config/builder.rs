use crate::config::types::MergedConfig;
use crate::error::Result;
use crate::remap::{DEFAULT_SEPARATOR, EngineKind, PrefixRemapper};
use tracing::debug;

/// Build a remapper from merged config plus command-line specs.
///
/// Config mappings are applied least specific first, then `extra_specs` in
/// order, so the command line has the last word. `engine` overrides the
/// configured engine.
pub fn build_remapper(
	merged: &MergedConfig,
	extra_specs: &[String],
	engine: Option<EngineKind>,
) -> Result<PrefixRemapper> {
	let engine = engine.or(merged.engine).unwrap_or_default();
	let separator = merged.separator.unwrap_or(DEFAULT_SEPARATOR);
	let mut remapper = PrefixRemapper::with_options(engine, separator)?;

	for source in &merged.sources {
		remapper.add_entries(source.mappings.iter().cloned())?;
		for candidates in &source.existing {
			remapper.add_existing(candidates.as_slice())?;
		}
		if let Some(ref map) = source.map {
			remapper.add_str(map)?;
		}
		debug!(
			path = %source.path.display(),
			total = remapper.len(),
			"Applied config mappings"
		);
	}

	for spec in extra_specs {
		remapper.add_str(spec)?;
	}

	Ok(remapper)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::MappingSource;
	use crate::remap::MappingEntry;
	use std::path::PathBuf;

	fn source(map: Option<&str>, mappings: Vec<MappingEntry>) -> MappingSource {
		MappingSource {
			map: map.map(str::to_string),
			mappings,
			existing: Vec::new(),
			path: PathBuf::from("test.toml"),
		}
	}

	#[test]
	fn test_command_line_overrides_config() {
		let merged = MergedConfig {
			sources: vec![
				source(None, vec![MappingEntry::new("/src", "/far")]),
				source(Some("/src:/near;/other:/elsewhere"), Vec::new()),
			],
			separator: None,
			engine: Some(EngineKind::Regex),
		};

		let remapper = build_remapper(&merged, &[], None).unwrap();
		assert_eq!(remapper.engine(), EngineKind::Regex);
		assert_eq!(remapper.remap("/src/a").unwrap(), "/near/a");

		let remapper = build_remapper(
			&merged,
			&["/src:/cli".to_string()],
			Some(EngineKind::Trie),
		)
		.unwrap();
		assert_eq!(remapper.engine(), EngineKind::Trie);
		assert_eq!(remapper.remap("/src/a").unwrap(), "/cli/a");
		assert_eq!(remapper.remap("/other").unwrap(), "/elsewhere");
	}

	#[test]
	fn test_empty_config_builds_identity_remapper() {
		let remapper = build_remapper(&MergedConfig::default(), &[], None).unwrap();
		assert!(remapper.is_empty());
		assert_eq!(remapper.engine(), EngineKind::Scan);
		assert_eq!(remapper.remap("/a/b").unwrap(), "/a/b");
	}

	#[test]
	fn test_invalid_cli_spec_is_rejected() {
		let result = build_remapper(&MergedConfig::default(), &["nope".to_string()], None);
		assert!(result.is_err());
	}
}
