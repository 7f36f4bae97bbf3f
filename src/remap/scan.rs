use crate::remap::engine::{Match, MatchIndex, by_specificity};
use crate::remap::path::strip_source;
use std::collections::BTreeMap;

/// Linear scan over entries sorted most specific first.
///
/// The first boundary-prefix hit is the longest one. Lookups are O(n), which
/// is the right trade-off for the handful of mappings a layout usually has.
#[derive(Debug)]
pub struct SortedScan {
	entries: Vec<(String, String)>,
	separator: char,
}

impl SortedScan {
	pub fn build(entries: &BTreeMap<String, String>, separator: char) -> Self {
		let entries = by_specificity(entries)
			.into_iter()
			.map(|(source, destination)| (source.to_string(), destination.to_string()))
			.collect();

		SortedScan { entries, separator }
	}
}

impl MatchIndex for SortedScan {
	fn longest_match<'i, 'p>(&'i self, path: &'p str) -> Option<Match<'i, 'p>> {
		self.entries.iter().find_map(|(source, destination)| {
			strip_source(path, source, self.separator).map(|remainder| Match {
				source,
				destination,
				remainder,
			})
		})
	}
}
