use crate::config::types::Config;
use crate::error::{DirmapError, Result};
use std::path::Path;

/// Template written by `dirmap --init`.
pub const INIT_TEMPLATE: &str = r#"# dirmap configuration
#
# Paths under a mapped source are rewritten to the destination. The most
# specific source wins; nearer config files override farther ones.

# Stop looking for .dirmap.toml in parent directories.
root = true

# Skip ~/.dirmap.toml when this environment variable is truthy.
# root-config-lookup-disable-env-var = "CI"

# Match engine: "scan", "trie" or "regex".
# engine = "scan"

# Inline mappings: "source:destination" pairs separated by ';'.
# map = "/mnt/old:/mnt/new"

# Map every path in the list to the one that exists on this machine.
# existing = [["/Volumes/heap", "/mnt/heap"]]

[[mappings]]
source = "/Volumes/projects"
destination = "/mnt/projects"
"#;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| DirmapError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| DirmapError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	// Validate the parsed config
	config.validate()?;

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::remap::{EngineKind, MappingEntry};
	use std::path::PathBuf;

	#[test]
	fn test_init_template_parses() {
		let path = PathBuf::from(".dirmap.toml");
		let config = parse_config_str(INIT_TEMPLATE, &path).unwrap();
		assert!(config.root);
		assert_eq!(config.mappings.len(), 1);
	}

	#[test]
	fn test_parse_empty_config() {
		let content = "";
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(!config.root);
		assert!(config.root_config_lookup_disable_env_var.is_none());
		assert!(config.separator.is_none());
		assert!(config.engine.is_none());
		assert!(config.mappings.is_empty());
		assert!(config.existing.is_empty());
	}

	#[test]
	fn test_parse_basic_config() {
		let content = r#"
root = true
root-config-lookup-disable-env-var = "CI"
separator = "/"
engine = "trie"
map = "/src:/dst"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(config.root);
		assert_eq!(
			config.root_config_lookup_disable_env_var,
			Some("CI".to_string())
		);
		assert_eq!(config.separator_char().unwrap(), Some('/'));
		assert_eq!(config.engine, Some(EngineKind::Trie));
		assert_eq!(config.map, Some("/src:/dst".to_string()));
	}

	#[test]
	fn test_parse_mappings_array_of_tables() {
		let content = r#"
[[mappings]]
source = "/Volumes/CGroot/Projects/SitG"
destination = "/Volumes/heap/sitg/work/film"

[[mappings]]
source = "/src"
destination = "/dst"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(
			config.mappings,
			vec![
				MappingEntry::new(
					"/Volumes/CGroot/Projects/SitG",
					"/Volumes/heap/sitg/work/film"
				),
				MappingEntry::new("/src", "/dst"),
			]
		);
	}

	#[test]
	fn test_parse_inline_tables_and_existing() {
		let content = r#"
mappings = [
    { source = "/a", destination = "/x" },
    { source = "/a/b", destination = "/y" },
]
existing = [["/mnt/old", "/mnt/new"]]
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.mappings.len(), 2);
		assert_eq!(config.existing, vec![vec!["/mnt/old", "/mnt/new"]]);
		assert_eq!(config.mapping_count(), 3);
	}

	#[test]
	fn test_invalid_mapping_path() {
		let content = r#"
[[mappings]]
source = "relative"
destination = "/dst"
"#;
		let path = PathBuf::from("test.toml");
		match parse_config_str(content, &path).unwrap_err() {
			DirmapError::InvalidPath { path, .. } => assert_eq!(path, "relative"),
			_ => panic!("Expected InvalidPath error"),
		}
	}

	#[test]
	fn test_invalid_separator() {
		let content = r#"separator = "//""#;
		let path = PathBuf::from("test.toml");
		assert!(matches!(
			parse_config_str(content, &path),
			Err(DirmapError::InvalidSeparator { .. })
		));
	}

	#[test]
	fn test_malformed_inline_map() {
		let content = r#"map = "/a:/b:/c""#;
		let path = PathBuf::from("test.toml");
		assert!(matches!(
			parse_config_str(content, &path),
			Err(DirmapError::MalformedEntry { .. })
		));
	}

	#[test]
	fn test_unknown_engine() {
		let content = r#"engine = "btree""#;
		let path = PathBuf::from("test.toml");
		assert!(matches!(
			parse_config_str(content, &path),
			Err(DirmapError::ConfigParseError { .. })
		));
	}
}
