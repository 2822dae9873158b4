//! Node counting and the size of a full quadtree.

use super::{Quadtree, QuadtreeNode};

/// Number of nodes in a full quadtree of depth `max_depth`, i.e. the sum
/// of `4^d` for `d` in `0..=max_depth`.
///
/// Saturates at `u64::MAX` past depth 31.
pub fn max_num_nodes(max_depth: u32) -> u64 {
	if max_depth >= 32 {
		return u64::MAX;
	}
	// (4^(d + 1) - 1) / 3
	let full = (1u128 << (2 * (max_depth + 1))) - 1;
	(full / 3) as u64
}

/// Smallest depth at which a `width` by `height` image can be split all
/// the way down to single pixels.
pub fn full_depth(width: u32, height: u32) -> u32 {
	let side = width.max(height);
	if side <= 1 {
		0
	} else {
		32 - (side - 1).leading_zeros()
	}
}

/// Fraction of the full quadtree of depth `max_depth` that `nodes`
/// represents; lower means more compression.
pub fn compression_ratio(nodes: u64, max_depth: u32) -> f64 {
	nodes as f64 / max_num_nodes(max_depth) as f64
}

impl QuadtreeNode {
	/// Counts this node and all of its descendants.
	pub fn count_nodes(&self) -> u64 {
		1 + self.sections.as_ref()
			.map(|s| s.iter().map(QuadtreeNode::count_nodes).sum::<u64>())
			.unwrap_or(0)
	}

	/// Depth of the deepest node below (and including) this one.
	pub fn depth(&self) -> u32 {
		match &self.sections {
			Some(s) => s.iter().map(QuadtreeNode::depth).max().unwrap_or(self.region.depth),
			None => self.region.depth,
		}
	}
}

impl Quadtree {
	/// Total number of nodes, internal and leaf.
	pub fn count_nodes(&self) -> u64 {
		self.root.count_nodes()
	}

	pub fn count_leaves(&self) -> u64 {
		self.leaves().count() as u64
	}

	/// Depth of the deepest leaf.
	pub fn depth(&self) -> u32 {
		self.root.depth()
	}

	/// This tree's node count against a full tree of its `max_depth`.
	pub fn compression_ratio(&self) -> f64 {
		compression_ratio(self.count_nodes(), self.max_depth)
	}
}
