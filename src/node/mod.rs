pub mod count;
pub mod error;
pub mod image;
pub mod metric;

use self::error::{QuadtreeError, Result};

/// Per-channel color of a node; three 8-bit channels, no alpha.
pub type Color = ::image::Rgb<u8>;

/// Half-open rectangle of pixels, plus the tree depth it sits at.
///
/// Rows run along the image's y axis and columns along its x axis.
/// A region is never empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
	pub row_start: u32,
	pub row_end: u32,
	pub col_start: u32,
	pub col_end: u32,
	pub depth: u32,
}

impl Region {
	/// Makes a region, refusing empty or inverted bounds.
	pub fn new(row_start: u32, row_end: u32, col_start: u32, col_end: u32, depth: u32) -> Result<Self> {
		let region = Region { row_start, row_end, col_start, col_end, depth };
		if row_end <= row_start || col_end <= col_start {
			return Err(QuadtreeError::InvalidConfiguration(
				format!("empty region {:?}", region)));
		}
		Ok(region)
	}

	/// The depth 0 region covering a whole `width` by `height` image.
	pub fn full(width: u32, height: u32) -> Result<Self> {
		if width == 0 || height == 0 {
			return Err(QuadtreeError::InvalidConfiguration(
				format!("image has zero area ({}x{})", width, height)));
		}
		Region::new(0, height, 0, width, 0)
	}

	pub fn height(&self) -> u32 {
		self.row_end - self.row_start
	}

	pub fn width(&self) -> u32 {
		self.col_end - self.col_start
	}

	/// Number of pixels covered.
	pub fn area(&self) -> u64 {
		self.height() as u64 * self.width() as u64
	}

	pub fn contains(&self, row: u32, col: u32) -> bool {
		(self.row_start..self.row_end).contains(&row) && (self.col_start..self.col_end).contains(&col)
	}

	/// Whether the two regions share at least one pixel.
	pub fn overlaps(&self, other: &Region) -> bool {
		self.row_start < other.row_end && other.row_start < self.row_end &&
			self.col_start < other.col_end && other.col_start < self.col_end
	}

	/// Whether the region lies inside a `width` by `height` buffer.
	pub fn fits(&self, width: u32, height: u32) -> bool {
		self.row_end <= height && self.col_end <= width
	}

	/// Splits the region into its NW, NE, SW and SE quadrants at depth + 1.
	///
	/// Bisection rounds down, so on an odd dimension the extra row goes to
	/// the southern pair and the extra column to the eastern pair.
	/// Returns `None` when either dimension is below 2, since one of the
	/// quadrants would be empty.
	pub fn quadrants(&self) -> Option<[Region; 4]> {
		if self.height() < 2 || self.width() < 2 {
			return None;
		}
		let mid_row = self.row_start + self.height() / 2;
		let mid_col = self.col_start + self.width() / 2;
		let depth = self.depth + 1;
		Some([
			Region { row_start: self.row_start, row_end: mid_row, col_start: self.col_start, col_end: mid_col, depth },
			Region { row_start: self.row_start, row_end: mid_row, col_start: mid_col, col_end: self.col_end, depth },
			Region { row_start: mid_row, row_end: self.row_end, col_start: self.col_start, col_end: mid_col, depth },
			Region { row_start: mid_row, row_end: self.row_end, col_start: mid_col, col_end: self.col_end, depth },
		])
	}
}

/// Node in a quadtree approximating an image.
///
/// May contain subnodes (branch node) or no subnodes (leaf node); it is
/// never partially split.
///
/// Every node carries the mean color and error score of its own full
/// region, computed straight from the pixels, so that pruning a subtree
/// away leaves a meaningful leaf behind.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadtreeNode {
	pub region: Region,
	pub color: Color,
	pub error: f64,
	/// NW, NE, SW, SE; see `Region::quadrants`.
	pub sections: Option<Box<[QuadtreeNode; 4]>>,
}

impl QuadtreeNode {
	/// A node without subnodes.
	pub fn leaf(region: Region, color: Color, error: f64) -> Self {
		QuadtreeNode { region, color, error, sections: None }
	}

	pub fn is_leaf(&self) -> bool {
		self.sections.is_none()
	}

	/// Borrowing iterator over the leaves below (and including) this node,
	/// in NW, NE, SW, SE depth-first order.
	pub fn leaves(&self) -> Leaves<'_> {
		Leaves { stack: vec![self] }
	}

	/// The leaf whose region holds pixel (`row`, `col`), if any.
	pub fn leaf_at(&self, row: u32, col: u32) -> Option<&QuadtreeNode> {
		if !self.region.contains(row, col) {
			return None;
		}
		let mut node = self;
		while let Some(sections) = &node.sections {
			node = sections.iter().find(|s| s.region.contains(row, col))?;
		}
		Some(node)
	}
}

/// See `QuadtreeNode::leaves`.
pub struct Leaves<'a> {
	stack: Vec<&'a QuadtreeNode>,
}

impl<'a> Iterator for Leaves<'a> {
	type Item = &'a QuadtreeNode;

	fn next(&mut self) -> Option<Self::Item> {
		while let Some(node) = self.stack.pop() {
			match &node.sections {
				Some(sections) => self.stack.extend(sections.iter().rev()),
				None => return Some(node),
			}
		}
		None
	}
}

/// A built quadtree together with the shape of the image it came from.
///
/// The source pixels are only borrowed while building; rendering needs
/// nothing but the dimensions recorded here.
#[derive(Clone, Debug, PartialEq)]
pub struct Quadtree {
	root: QuadtreeNode,
	width: u32,
	height: u32,
	max_depth: u32,
}

impl Quadtree {
	pub fn root(&self) -> &QuadtreeNode {
		&self.root
	}

	pub(crate) fn root_mut(&mut self) -> &mut QuadtreeNode {
		&mut self.root
	}

	/// Width of the source image.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height of the source image.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// The depth limit the tree was built with.
	pub fn max_depth(&self) -> u32 {
		self.max_depth
	}

	pub fn leaves(&self) -> Leaves<'_> {
		self.root.leaves()
	}

	pub fn leaf_at(&self, row: u32, col: u32) -> Option<&QuadtreeNode> {
		self.root.leaf_at(row, col)
	}
}
