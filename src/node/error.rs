use thiserror::Error;

use super::Region;

/// Reason why a quadtree couldn't be built, compressed or rendered.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuadtreeError {
	/// A build or compress parameter is out of range, or the image is empty.
	///
	/// Reported as soon as the call starts; nothing is clamped or retried.
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),
	/// A region does not fit the pixel buffer it is meant to describe.
	///
	/// The builder and renderer maintain the partition invariant, so this
	/// points at a bug rather than at bad input.
	#[error("region {region:?} does not fit a {width}x{height} pixel buffer")]
	ShapeMismatch {
		region: Region,
		width: u32,
		height: u32,
	},
}

/// Result type for quadtree operations.
pub type Result<T> = std::result::Result<T, QuadtreeError>;
