use ::image::RgbImage;

use super::error::{QuadtreeError, Result};
use super::metric::IntegralImage;
use super::{Color, Quadtree, QuadtreeNode, Region};
use crate::config::BuildOptions;

/// Color drawn over leaf outlines by `to_image(true)`.
pub const BOX_COLOR: Color = ::image::Rgb([0, 0, 0]);

/// Regions smaller than this are built on the current thread even when
/// parallel construction is enabled.
const PARALLEL_MIN_AREA: u64 = 64 * 64;

impl QuadtreeNode {
	/// Builds the subtree covering `region`, reading pixel statistics from
	/// `integral`.
	///
	/// The node becomes a leaf when the region is no larger than
	/// `min_block_size` in both directions, when it sits at `max_depth`,
	/// when it is already uniform, or when it is too thin to have four
	/// non-empty quadrants.
	pub fn build(integral: &IntegralImage, region: Region, options: &BuildOptions) -> Result<Self> {
		let stats = integral.stats(&region)?;
		let small = region.height() <= options.min_block_size && region.width() <= options.min_block_size;
		let quadrants = match region.quadrants() {
			Some(q) if !small && region.depth < options.max_depth && stats.error > 0. => q,
			_ => return Ok(QuadtreeNode::leaf(region, stats.mean, stats.error)),
		};

		let [nw, ne, sw, se] = quadrants;
		let build = |r: Region| QuadtreeNode::build(integral, r, options);
		let (nw, ne, sw, se) = if options.parallel && region.area() >= PARALLEL_MIN_AREA {
			let ((nw, ne), (sw, se)) = rayon::join(
				|| rayon::join(|| build(nw), || build(ne)),
				|| rayon::join(|| build(sw), || build(se)),
			);
			(nw, ne, sw, se)
		} else {
			(build(nw), build(ne), build(sw), build(se))
		};

		Ok(QuadtreeNode {
			region,
			color: stats.mean,
			error: stats.error,
			sections: Some(Box::new([nw?, ne?, sw?, se?])),
		})
	}

	/// Paints every leaf below this node into `img`.
	///
	/// Each leaf fills its region with its mean color; with `draw_box` the
	/// leaf's top row and left column are then painted with `BOX_COLOR`.
	pub fn draw(&self, img: &mut RgbImage, draw_box: bool) -> Result<()> {
		if !self.region.fits(img.width(), img.height()) {
			return Err(QuadtreeError::ShapeMismatch {
				region: self.region,
				width: img.width(),
				height: img.height(),
			});
		}
		match &self.sections {
			Some(sections) => {
				for section in sections.iter() {
					section.draw(img, draw_box)?;
				}
			},
			None => {
				let r = &self.region;
				for row in r.row_start..r.row_end {
					for col in r.col_start..r.col_end {
						let on_box = draw_box && (row == r.row_start || col == r.col_start);
						img.put_pixel(col, row, if on_box { BOX_COLOR } else { self.color });
					}
				}
			},
		}
		Ok(())
	}
}

impl Quadtree {
	/// Decomposes `pixels` into a quadtree, splitting at most `max_depth`
	/// times and never below `min_block_size` pixels a side.
	///
	/// Fails with `InvalidConfiguration` if `min_block_size` is 0 or the
	/// image is empty.
	pub fn build(pixels: &RgbImage, max_depth: u32, min_block_size: u32) -> Result<Self> {
		Quadtree::build_with(pixels, &BuildOptions::default()
			.with_max_depth(max_depth)
			.with_min_block_size(min_block_size))
	}

	/// Like `build`, with every option spelled out.
	pub fn build_with(pixels: &RgbImage, options: &BuildOptions) -> Result<Self> {
		options.validate()?;
		let region = Region::full(pixels.width(), pixels.height())?;
		let integral = IntegralImage::new(pixels);
		let root = QuadtreeNode::build(&integral, region, options)?;
		let tree = Quadtree {
			root,
			width: pixels.width(),
			height: pixels.height(),
			max_depth: options.max_depth,
		};
		tracing::debug!(
			width = tree.width,
			height = tree.height,
			max_depth = options.max_depth,
			min_block_size = options.min_block_size,
			nodes = tree.count_nodes(),
			"built quadtree"
		);
		Ok(tree)
	}

	/// Renders the tree into a new image the size of the source image.
	///
	/// `draw_box` outlines each leaf; such output is for looking at only and
	/// says nothing about fidelity.
	pub fn to_image(&self, draw_box: bool) -> Result<RgbImage> {
		let mut img = RgbImage::new(self.width, self.height);
		self.draw_into(&mut img, draw_box)?;
		Ok(img)
	}

	/// Renders the tree into `img`, which must match the source image's
	/// dimensions.
	pub fn draw_into(&self, img: &mut RgbImage, draw_box: bool) -> Result<()> {
		if img.dimensions() != (self.width, self.height) {
			return Err(QuadtreeError::ShapeMismatch {
				region: self.root.region,
				width: img.width(),
				height: img.height(),
			});
		}
		self.root.draw(img, draw_box)?;
		tracing::debug!(leaves = self.count_leaves(), draw_box, "rendered quadtree");
		Ok(())
	}
}
