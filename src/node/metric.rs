//! Per-region mean color and error score.
//!
//! Sums are kept as exact integers all the way to the variance numerator,
//! so a uniform region scores exactly `0.0` and the same region always
//! scores the same no matter which path computed it.

use ::image::RgbImage;

use super::error::{QuadtreeError, Result};
use super::{Color, Region};

/// Weights applied to the red, green and blue standard deviations.
///
/// ITU-R BT.601 luma coefficients; they sum to 1.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Mean color and error score of one region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionStats {
	pub mean: Color,
	pub error: f64,
}

/// Raw per-channel sums over a set of pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelSums {
	pub count: u64,
	pub sum: [u64; 3],
	pub sum_sq: [u64; 3],
}

impl ChannelSums {
	pub fn push(&mut self, pixel: &Color) {
		self.count += 1;
		for c in 0..3 {
			let v = pixel.0[c] as u64;
			self.sum[c] += v;
			self.sum_sq[c] += v * v;
		}
	}

	/// Rounded mean and luma-weighted standard deviation.
	///
	/// An empty set of sums has no meaningful statistics and reads as
	/// black with zero error.
	pub fn stats(&self) -> RegionStats {
		if self.count == 0 {
			return RegionStats { mean: ::image::Rgb([0; 3]), error: 0. };
		}
		let n = self.count as u128;
		let mut mean = [0u8; 3];
		let mut error = 0.;
		for c in 0..3 {
			let sum = self.sum[c] as u128;
			// Round half up
			mean[c] = ((2 * sum + n) / (2 * n)) as u8;
			// n^2 * variance, exact
			let spread = n * self.sum_sq[c] as u128 - sum * sum;
			if spread != 0 {
				error += LUMA_WEIGHTS[c] * ((spread as f64).sqrt() / n as f64);
			}
		}
		RegionStats { mean: ::image::Rgb(mean), error }
	}
}

fn check_fits(pixels: &RgbImage, region: &Region) -> Result<()> {
	if region.fits(pixels.width(), pixels.height()) {
		Ok(())
	} else {
		Err(QuadtreeError::ShapeMismatch {
			region: *region,
			width: pixels.width(),
			height: pixels.height(),
		})
	}
}

/// Computes the mean color and error score of `region` by visiting every
/// pixel in it.
pub fn region_stats(pixels: &RgbImage, region: &Region) -> Result<RegionStats> {
	check_fits(pixels, region)?;
	let mut sums = ChannelSums::default();
	for row in region.row_start..region.row_end {
		for col in region.col_start..region.col_end {
			sums.push(pixels.get_pixel(col, row));
		}
	}
	Ok(sums.stats())
}

/// Summed-area tables of the per-channel values and squared values.
///
/// Built once per image; afterwards the sums for any region come out in
/// constant time and are identical to what `region_stats` accumulates.
#[derive(Clone, Debug)]
pub struct IntegralImage {
	/// `(height + 1) * (width + 1)` entries; row 0 and column 0 are zero.
	sum: Vec<[u64; 3]>,
	sum_sq: Vec<[u64; 3]>,
	width: u32,
	height: u32,
}

impl IntegralImage {
	pub fn new(pixels: &RgbImage) -> Self {
		let (width, height) = pixels.dimensions();
		let stride = width as usize + 1;
		let len = stride * (height as usize + 1);
		let mut sum = vec![[0u64; 3]; len];
		let mut sum_sq = vec![[0u64; 3]; len];
		for row in 0..height as usize {
			let mut row_sum = [0u64; 3];
			let mut row_sum_sq = [0u64; 3];
			for col in 0..width as usize {
				let pixel = pixels.get_pixel(col as u32, row as u32);
				let at = (row + 1) * stride + col + 1;
				let above = row * stride + col + 1;
				for c in 0..3 {
					let v = pixel.0[c] as u64;
					row_sum[c] += v;
					row_sum_sq[c] += v * v;
					sum[at][c] = sum[above][c] + row_sum[c];
					sum_sq[at][c] = sum_sq[above][c] + row_sum_sq[c];
				}
			}
		}
		IntegralImage { sum, sum_sq, width, height }
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// Channel sums over `region`.
	pub fn sums(&self, region: &Region) -> Result<ChannelSums> {
		if !region.fits(self.width, self.height) {
			return Err(QuadtreeError::ShapeMismatch {
				region: *region,
				width: self.width,
				height: self.height,
			});
		}
		let stride = self.width as usize + 1;
		let top_left = region.row_start as usize * stride + region.col_start as usize;
		let top_right = region.row_start as usize * stride + region.col_end as usize;
		let bottom_left = region.row_end as usize * stride + region.col_start as usize;
		let bottom_right = region.row_end as usize * stride + region.col_end as usize;
		let rect = |table: &[[u64; 3]], c: usize| {
			// Grouped so the unsigned intermediate never goes negative
			(table[bottom_right][c] + table[top_left][c]) -
				(table[top_right][c] + table[bottom_left][c])
		};
		let mut sums = ChannelSums { count: region.area(), ..Default::default() };
		for c in 0..3 {
			sums.sum[c] = rect(&self.sum, c);
			sums.sum_sq[c] = rect(&self.sum_sq, c);
		}
		Ok(sums)
	}

	/// Same result as `region_stats`, in constant time.
	pub fn stats(&self, region: &Region) -> Result<RegionStats> {
		Ok(self.sums(region)?.stats())
	}
}
