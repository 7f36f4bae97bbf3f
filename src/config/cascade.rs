use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MappingSource, MergedConfig};
use crate::error::{DirmapError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in each directory of the cascade.
pub const CONFIG_FILE_NAME: &str = ".dirmap.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.dirmap.toml`
/// 2. If found and `root = true`, skip to user config only
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.dirmap.toml (unless disabled)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	// Walk up the directory tree
	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.exists() {
			let config = parse_config_file(&config_path)?;
			debug!(path = %config_path.display(), root = config.root, "Loaded config");

			let stop = config.root;
			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if stop {
				break;
			}
		}

		// Move to parent directory
		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			break;
		}
	}

	// Check user config unless disabled by env var
	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.dirmap.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	// Check if any config disables user config lookup via env var
	for loaded in existing_configs {
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var
			&& env_flag_set(env_var)
		{
			debug!(env_var, "User config lookup disabled");
			return Ok(None);
		}
	}

	let user_config_path = user_config_path()?;

	// The walk may already have reached the home directory.
	if existing_configs
		.iter()
		.any(|loaded| loaded.path == user_config_path)
	{
		return Ok(None);
	}

	if user_config_path.exists() {
		let config = parse_config_file(&user_config_path)?;
		debug!(path = %user_config_path.display(), "Loaded user config");
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// True when `name` is set to anything but empty, `0`, `false` or `no`.
fn env_flag_set(name: &str) -> bool {
	std::env::var(name).is_ok_and(|value| {
		let value = value.trim();
		!(value.is_empty()
			|| value == "0"
			|| value.eq_ignore_ascii_case("false")
			|| value.eq_ignore_ascii_case("no"))
	})
}

/// Merge multiple configs into a single effective config.
///
/// Mapping sources are collected least specific first, so under
/// last-write-wins the config nearest the start directory decides.
/// `separator` and `engine` come from the nearest config that sets them, and
/// every config's paths must be valid under that separator.
pub fn merge_configs(configs: &[LoadedConfig]) -> Result<MergedConfig> {
	let mut merged = MergedConfig::default();

	for loaded in configs.iter().rev() {
		let config = &loaded.config;

		merged.sources.push(MappingSource {
			map: config.map.clone(),
			mappings: config.mappings.clone(),
			existing: config.existing.clone(),
			path: loaded.path.clone(),
		});

		if let Some(separator) = config.separator_char()? {
			merged.separator = Some(separator);
		}
		if let Some(engine) = config.engine {
			merged.engine = Some(engine);
		}
	}

	merged.validate()?;
	Ok(merged)
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	merge_configs(&configs)
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(DirmapError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
