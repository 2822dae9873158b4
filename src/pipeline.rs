//! Build, compress and render in one call.

use ::image::RgbImage;

use crate::config::CompressionConfig;
use crate::node::count::max_num_nodes;
use crate::node::error::Result;
use crate::node::Quadtree;

/// Node counts before and after pruning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompressionReport {
	/// Nodes in the tree as built.
	pub full_nodes: u64,
	/// Nodes left after pruning.
	pub pruned_nodes: u64,
	pub leaves: u64,
	/// Nodes in a complete quadtree of the configured depth.
	pub max_nodes: u64,
	/// `pruned_nodes / max_nodes`.
	pub ratio: f64,
}

/// Output of `compress_image`.
#[derive(Clone, Debug)]
pub struct Compressed {
	pub tree: Quadtree,
	pub image: RgbImage,
	pub report: CompressionReport,
}

/// Decomposes `pixels`, prunes at `config.threshold` and renders the result.
///
/// All of `config` is checked before any work starts.
#[tracing::instrument(skip_all, fields(width = pixels.width(), height = pixels.height()))]
pub fn compress_image(pixels: &RgbImage, config: &CompressionConfig) -> Result<Compressed> {
	config.validate()?;
	let full = Quadtree::build_with(pixels, &config.build)?;
	let tree = full.compress(config.threshold)?;
	let image = tree.to_image(false)?;

	let max_nodes = max_num_nodes(config.build.max_depth);
	let report = CompressionReport {
		full_nodes: full.count_nodes(),
		pruned_nodes: tree.count_nodes(),
		leaves: tree.count_leaves(),
		max_nodes,
		ratio: tree.compression_ratio(),
	};
	tracing::debug!(?report, "compressed image");
	Ok(Compressed { tree, image, report })
}
