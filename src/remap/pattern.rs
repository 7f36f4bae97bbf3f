use crate::error::{DirmapError, Result};
use crate::remap::engine::{Match, MatchIndex, by_specificity};
use regex::Regex;
use std::collections::BTreeMap;

/// One anchored regular expression per source, tried most specific first.
///
/// Each pattern is the literal source optionally followed by the separator
/// and anything; the remainder is captured as group 1. Ordering is ours, not
/// the regex engine's.
#[derive(Debug)]
pub struct CompiledPatterns {
	rules: Vec<CompiledMapping>,
}

#[derive(Debug)]
struct CompiledMapping {
	pattern: Regex,
	source: String,
	destination: String,
}

impl CompiledPatterns {
	pub fn build(entries: &BTreeMap<String, String>, separator: char) -> Result<Self> {
		let rules = by_specificity(entries)
			.into_iter()
			.map(|(source, destination)| {
				Ok(CompiledMapping {
					pattern: compile_source(source, separator)?,
					source: source.to_string(),
					destination: destination.to_string(),
				})
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(CompiledPatterns { rules })
	}
}

/// Compile the anchored pattern for one source.
fn compile_source(source: &str, separator: char) -> Result<Regex> {
	let sep = regex::escape(&separator.to_string());
	let pattern = format!("^{}(?s:{sep}(.*))?$", regex::escape(source));

	Regex::new(&pattern).map_err(|source_err| DirmapError::PatternCompile {
		source_path: source.to_string(),
		source: source_err,
	})
}

impl MatchIndex for CompiledPatterns {
	fn longest_match<'i, 'p>(&'i self, path: &'p str) -> Option<Match<'i, 'p>> {
		self.rules.iter().find_map(|rule| {
			rule.pattern.captures(path).map(|caps| Match {
				source: &rule.source,
				destination: &rule.destination,
				remainder: caps.get(1).map_or("", |m| m.as_str()),
			})
		})
	}
}
