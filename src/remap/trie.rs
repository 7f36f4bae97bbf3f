use crate::remap::engine::{Match, MatchIndex};
use crate::remap::path::{is_root, segments};
use std::collections::{BTreeMap, HashMap};

/// Sources stored in a trie keyed by path segment.
///
/// A lookup walks the query's segments and keeps the deepest node that ends a
/// mapping, so its cost depends on the depth of the path and not on the
/// number of mappings.
#[derive(Debug)]
pub struct SegmentTrie {
	root: TrieNode,
	separator: char,
}

#[derive(Debug, Default)]
struct TrieNode {
	/// Set when a stored source ends at this node.
	mapping: Option<(String, String)>,
	children: HashMap<String, TrieNode>,
}

impl SegmentTrie {
	pub fn build(entries: &BTreeMap<String, String>, separator: char) -> Self {
		let mut root = TrieNode::default();

		for (source, destination) in entries {
			let mut node = &mut root;
			for segment in segments(source, separator) {
				node = node.children.entry(segment.to_string()).or_default();
			}
			node.mapping = Some((source.clone(), destination.clone()));
		}

		SegmentTrie { root, separator }
	}
}

impl MatchIndex for SegmentTrie {
	fn longest_match<'i, 'p>(&'i self, path: &'p str) -> Option<Match<'i, 'p>> {
		let sep_len = self.separator.len_utf8();
		let mut node = &self.root;
		// Byte offset just past the deepest consumed segment.
		let mut consumed = 0;
		// A root source only matches the root path.
		let mut best = node
			.mapping
			.as_ref()
			.filter(|_| is_root(path, self.separator))
			.map(|mapping| (mapping, consumed));

		for segment in segments(path, self.separator) {
			match node.children.get(segment) {
				Some(child) => node = child,
				None => break,
			}
			consumed += sep_len + segment.len();
			if let Some(mapping) = &node.mapping {
				best = Some((mapping, consumed));
			}
		}

		best.map(|((source, destination), consumed)| Match {
			source,
			destination,
			remainder: &path[(consumed + sep_len).min(path.len())..],
		})
	}
}
