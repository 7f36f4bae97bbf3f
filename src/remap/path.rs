use crate::error::{DirmapError, PathRole, Result};

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: char = '/';

/// Check that `path` is absolute and already in normal form.
///
/// A clean path starts with the separator and, unless it is the root itself,
/// has no trailing separator, no empty segments and no `.` or `..` segments.
pub fn check_clean(path: &str, separator: char) -> std::result::Result<(), &'static str> {
	if !path.starts_with(separator) {
		return Err("must be absolute");
	}
	if is_root(path, separator) {
		return Ok(());
	}
	if path.ends_with(separator) {
		return Err("must not end with a separator");
	}

	for segment in path[separator.len_utf8()..].split(separator) {
		match segment {
			"" => return Err("must not contain repeated separators"),
			"." | ".." => return Err("must not contain '.' or '..' segments"),
			_ => {}
		}
	}

	Ok(())
}

/// Returns true if `path` is absolute and normalized.
pub fn is_clean(path: &str, separator: char) -> bool {
	check_clean(path, separator).is_ok()
}

/// Validate a path, tagging the error with the role it plays.
pub fn validate(path: &str, role: PathRole, separator: char) -> Result<()> {
	check_clean(path, separator).map_err(|reason| DirmapError::InvalidPath {
		role,
		path: path.to_string(),
		reason,
	})
}

/// Validate a separator character.
///
/// `.` would make normalization ambiguous and control characters cannot
/// appear in a sensible path.
pub fn validate_separator(separator: char) -> Result<char> {
	if separator == '.' || separator.is_control() || separator.is_whitespace() {
		return Err(DirmapError::InvalidSeparator {
			separator: separator.to_string(),
		});
	}
	Ok(separator)
}

/// Returns true if `path` is the filesystem root.
pub fn is_root(path: &str, separator: char) -> bool {
	path.len() == separator.len_utf8() && path.starts_with(separator)
}

/// The segments of a clean path. The root has none.
pub fn segments(path: &str, separator: char) -> impl Iterator<Item = &str> {
	path.get(separator.len_utf8()..)
		.unwrap_or("")
		.split(separator)
		.filter(|segment| !segment.is_empty())
}

/// Strip `source` from the front of `path` at a directory boundary.
///
/// Returns the remainder after the source and its trailing separator, or an
/// empty string on an exact match. `/src` does not strip from `/src2`, and
/// the root source only strips from the root itself.
pub fn strip_source<'p>(path: &'p str, source: &str, separator: char) -> Option<&'p str> {
	let rest = path.strip_prefix(source)?;
	if rest.is_empty() {
		Some(rest)
	} else {
		rest.strip_prefix(separator)
	}
}

/// Reassemble a destination and a remainder.
pub fn join(destination: &str, remainder: &str, separator: char) -> String {
	if remainder.is_empty() {
		return destination.to_string();
	}

	let mut joined = String::with_capacity(destination.len() + 1 + remainder.len());
	joined.push_str(destination);
	if !destination.ends_with(separator) {
		joined.push(separator);
	}
	joined.push_str(remainder);
	joined
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_clean_paths() {
		assert!(is_clean("/", '/'));
		assert!(is_clean("/src", '/'));
		assert!(is_clean("/src/inner/deep", '/'));
		assert!(is_clean("/src with spaces", '/'));
		assert!(is_clean("/a/.hidden/b..c", '/'));
	}

	#[test]
	fn test_unclean_paths() {
		assert_eq!(check_clean("relative/path", '/'), Err("must be absolute"));
		assert_eq!(check_clean("", '/'), Err("must be absolute"));
		assert_eq!(
			check_clean("/src/", '/'),
			Err("must not end with a separator")
		);
		assert_eq!(
			check_clean("/src//inner", '/'),
			Err("must not contain repeated separators")
		);
		assert_eq!(
			check_clean("/a/../b", '/'),
			Err("must not contain '.' or '..' segments")
		);
		assert_eq!(
			check_clean("/a/./b", '/'),
			Err("must not contain '.' or '..' segments")
		);
		assert!(!is_clean("//", '/'));
	}

	#[test]
	fn test_validate_reports_role() {
		let err = validate("nope", PathRole::Destination, '/').unwrap_err();
		match err {
			DirmapError::InvalidPath { role, path, .. } => {
				assert_eq!(role, PathRole::Destination);
				assert_eq!(path, "nope");
			}
			_ => panic!("Expected InvalidPath error"),
		}
	}

	#[test]
	fn test_custom_separator() {
		assert!(is_clean(r"\share\projects", '\\'));
		assert!(!is_clean("/share/projects", '\\'));
		assert_eq!(
			strip_source(r"\share\projects\a", r"\share", '\\'),
			Some(r"projects\a")
		);
	}

	#[test]
	fn test_validate_separator() {
		assert!(validate_separator('/').is_ok());
		assert!(validate_separator('\\').is_ok());
		assert!(validate_separator('.').is_err());
		assert!(validate_separator(' ').is_err());
		assert!(validate_separator('\n').is_err());
	}

	#[test]
	fn test_segments() {
		assert_eq!(segments("/", '/').count(), 0);
		assert_eq!(segments("/a/b/c", '/').collect::<Vec<_>>(), ["a", "b", "c"]);
	}

	#[test]
	fn test_strip_source_boundaries() {
		assert_eq!(strip_source("/src", "/src", '/'), Some(""));
		assert_eq!(strip_source("/src/a/b", "/src", '/'), Some("a/b"));
		assert_eq!(strip_source("/src2/thing", "/src", '/'), None);
		assert_eq!(strip_source("/other", "/src", '/'), None);
		assert_eq!(strip_source("/", "/", '/'), Some(""));
		assert_eq!(strip_source("/anything/here", "/", '/'), None);
		assert_eq!(strip_source("/src", "/", '/'), None);
	}

	#[test]
	fn test_join() {
		assert_eq!(join("/dst", "", '/'), "/dst");
		assert_eq!(join("/dst", "a/b", '/'), "/dst/a/b");
		assert_eq!(join("/", "a/b", '/'), "/a/b");
	}
}
