//! Lossy image compression with quadtrees.
//!
//! An image is split recursively into quadrants until each region is
//! uniform, small enough, or deep enough. Every node remembers the mean
//! color and error score of its own region, so compressing is just cutting
//! off the subtrees below nodes whose error is within a threshold, and
//! rendering paints each remaining leaf with its mean color.
//!
//! ```
//! use quadtree_prune::Quadtree;
//!
//! let img = image::RgbImage::from_fn(8, 8, |x, _| image::Rgb([x as u8 * 30, 0, 0]));
//! let tree = Quadtree::build(&img, 3, 1).unwrap();
//! let small = tree.compress(20.).unwrap();
//! assert!(small.count_nodes() <= tree.count_nodes());
//! let out = small.to_image(false).unwrap();
//! assert_eq!(out.dimensions(), img.dimensions());
//! ```

pub mod config;
pub mod node;
pub mod pipeline;

pub use config::{BuildOptions, CompressionConfig};
pub use node::count::{compression_ratio, full_depth, max_num_nodes};
pub use node::error::{QuadtreeError, Result};
pub use node::image::BOX_COLOR;
pub use node::metric::{region_stats, IntegralImage, RegionStats, LUMA_WEIGHTS};
pub use node::{Color, Leaves, Quadtree, QuadtreeNode, Region};
pub use pipeline::{compress_image, Compressed, CompressionReport};

impl node::QuadtreeNode {
	/// "Prunes" the subtree by collapsing branch nodes into leaves.
	///
	/// A branch node whose own error is at most `threshold` drops all of its
	/// descendants and keeps the color and error it was built with. The
	/// decision looks at nothing but the node itself, so the result is the
	/// same whichever order the tree is walked in.
	///
	/// Returns the number of nodes removed.
	pub fn prune(&mut self, threshold: f64) -> u64 {
		let sections = match &mut self.sections {
			Some(sections) => sections,
			None => return 0,
		};
		if self.error <= threshold {
			let removed: u64 = sections.iter().map(node::QuadtreeNode::count_nodes).sum();
			tracing::trace!(region = ?self.region, error = self.error, removed, "collapsing node");
			self.sections = None;
			removed
		} else {
			sections.iter_mut().map(|s| s.prune(threshold)).sum()
		}
	}
}

impl node::Quadtree {
	/// Returns a pruned copy of the tree; see `QuadtreeNode::prune`.
	///
	/// Fails with `InvalidConfiguration` if `threshold` is negative or not
	/// finite. Compressing the result again with the same threshold gives
	/// the same tree back.
	pub fn compress(&self, threshold: f64) -> Result<node::Quadtree> {
		let mut pruned = self.clone();
		pruned.compress_in_place(threshold)?;
		Ok(pruned)
	}

	/// Prunes the tree in place, returning the number of nodes removed.
	pub fn compress_in_place(&mut self, threshold: f64) -> Result<u64> {
		config::validate_threshold(threshold)?;
		let removed = self.root_mut().prune(threshold);
		tracing::debug!(threshold, removed, nodes = self.count_nodes(), "compressed quadtree");
		Ok(removed)
	}
}
