use std::path::PathBuf;

/// Library-level structured errors for dirmap.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum DirmapError {
	#[error("{role} path is invalid: {path:?} ({reason})")]
	InvalidPath {
		role: PathRole,
		path: String,
		reason: &'static str,
	},

	#[error("Malformed mapping entry (expected exactly one ':'): {entry:?}")]
	MalformedEntry { entry: String },

	#[error("Expected exactly one existing path among {candidates:?}, found {existing}")]
	AmbiguousExistence {
		candidates: Vec<String>,
		existing: usize,
	},

	#[error("Unknown engine: {name} (expected one of: scan, trie, regex)")]
	UnknownEngine { name: String },

	#[error("Failed to compile match pattern for source: {source_path}")]
	PatternCompile {
		source_path: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid path separator: {separator:?}")]
	InvalidSeparator { separator: String },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Config file does not fit the merged separator {separator:?}: {path}")]
	ConfigSeparatorMismatch {
		path: PathBuf,
		separator: char,
		#[source]
		source: Box<DirmapError>,
	},

	#[error("Invalid JSON document")]
	JsonError(#[from] serde_json::Error),

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Which side of a mapping (or a query) a path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
	Source,
	Destination,
	Query,
}

impl std::fmt::Display for PathRole {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			PathRole::Source => "Source",
			PathRole::Destination => "Destination",
			PathRole::Query => "Query",
		})
	}
}

/// Result type alias using DirmapError.
pub type Result<T> = std::result::Result<T, DirmapError>;
