use crate::node::error::{QuadtreeError, Result};
use crate::node::count::full_depth;

/// Parameters for building a quadtree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildOptions {
	/// Deepest level a node may sit at; the root is depth 0.
	pub max_depth: u32,
	/// Regions at most this many pixels tall and wide are not split further.
	/// Must be at least 1.
	pub min_block_size: u32,
	/// Build large quadrants on the rayon thread pool.
	/// The resulting tree is the same either way.
	pub parallel: bool,
}

impl Default for BuildOptions {
	fn default() -> Self {
		BuildOptions { max_depth: 8, min_block_size: 1, parallel: true }
	}
}

impl BuildOptions {
	/// Options deep enough to reach single pixels on a `width` by `height`
	/// image.
	pub fn full_resolution(width: u32, height: u32) -> Self {
		BuildOptions { max_depth: full_depth(width, height), ..Default::default() }
	}

	pub fn with_max_depth(mut self, max_depth: u32) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn with_min_block_size(mut self, min_block_size: u32) -> Self {
		self.min_block_size = min_block_size;
		self
	}

	pub fn with_parallel(mut self, parallel: bool) -> Self {
		self.parallel = parallel;
		self
	}

	pub fn validate(&self) -> Result<()> {
		if self.min_block_size < 1 {
			return Err(QuadtreeError::InvalidConfiguration(
				"min_block_size must be at least 1".to_string()));
		}
		Ok(())
	}
}

/// Checks a pruning threshold: finite and not negative.
pub fn validate_threshold(threshold: f64) -> Result<()> {
	if !threshold.is_finite() || threshold < 0. {
		return Err(QuadtreeError::InvalidConfiguration(
			format!("threshold must be a finite number >= 0, got {}", threshold)));
	}
	Ok(())
}

/// Everything `compress_image` needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompressionConfig {
	pub build: BuildOptions,
	/// Internal nodes whose error is at most this are collapsed into leaves.
	pub threshold: f64,
}

impl Default for CompressionConfig {
	fn default() -> Self {
		CompressionConfig { build: BuildOptions::default(), threshold: 0. }
	}
}

impl CompressionConfig {
	pub fn new(build: BuildOptions, threshold: f64) -> Self {
		CompressionConfig { build, threshold }
	}

	pub fn with_threshold(mut self, threshold: f64) -> Self {
		self.threshold = threshold;
		self
	}

	pub fn validate(&self) -> Result<()> {
		self.build.validate()?;
		validate_threshold(self.threshold)
	}
}
