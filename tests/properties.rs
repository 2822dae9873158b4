//! Whole-tree properties checked over a spread of image shapes.

use image::{Rgb, RgbImage};
use quadtree_prune::{max_num_nodes, Quadtree, QuadtreeNode, Region};

const SHAPES: &[(u32, u32)] = &[(1, 1), (2, 2), (3, 5), (7, 4), (8, 8), (16, 9), (17, 17), (31, 2), (40, 33)];

fn noise(width: u32, height: u32, seed: u32) -> RgbImage {
	let mut state = seed.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
	RgbImage::from_fn(width, height, |_, _| {
		// xorshift32
		state ^= state << 13;
		state ^= state >> 17;
		state ^= state << 5;
		Rgb([state as u8, (state >> 8) as u8, (state >> 16) as u8])
	})
}

/// Blocky image with soft noise, so trees prune at a range of thresholds.
fn patches(width: u32, height: u32) -> RgbImage {
	let grain = noise(width, height, 7);
	RgbImage::from_fn(width, height, |x, y| {
		let g = grain.get_pixel(x, y).0;
		let base = [((x / 4) * 60 % 256) as u8, ((y / 3) * 45 % 256) as u8, 128];
		Rgb([base[0].saturating_add(g[0] % 8), base[1].saturating_add(g[1] % 8), base[2] ^ (g[2] % 4)])
	})
}

fn walk<'a>(node: &'a QuadtreeNode, out: &mut Vec<&'a QuadtreeNode>) {
	out.push(node);
	if let Some(sections) = &node.sections {
		for s in sections.iter() {
			walk(s, out);
		}
	}
}

fn nodes(tree: &Quadtree) -> Vec<&QuadtreeNode> {
	let mut out = Vec::new();
	walk(tree.root(), &mut out);
	out
}

#[test]
fn children_partition_their_parent() {
	for &(w, h) in SHAPES {
		let tree = Quadtree::build(&noise(w, h, w * 31 + h), 10, 1).unwrap();
		for node in nodes(&tree) {
			let sections = match &node.sections {
				Some(s) => s,
				None => continue,
			};
			let area: u64 = sections.iter().map(|s| s.region.area()).sum();
			assert_eq!(area, node.region.area(), "{}x{} {:?}", w, h, node.region);
			for (i, a) in sections.iter().enumerate() {
				assert_eq!(a.region.depth, node.region.depth + 1);
				assert!(a.region.row_start >= node.region.row_start && a.region.row_end <= node.region.row_end);
				assert!(a.region.col_start >= node.region.col_start && a.region.col_end <= node.region.col_end);
				for b in sections.iter().skip(i + 1) {
					assert!(!a.region.overlaps(&b.region), "{:?} overlaps {:?}", a.region, b.region);
				}
			}
		}
	}
}

#[test]
fn leaves_cover_every_pixel_once() {
	for &(w, h) in SHAPES {
		let tree = Quadtree::build(&noise(w, h, 3), 10, 2).unwrap();
		let mut hits = vec![0u8; (w * h) as usize];
		for leaf in tree.leaves() {
			let r = leaf.region;
			for row in r.row_start..r.row_end {
				for col in r.col_start..r.col_end {
					hits[(row * w + col) as usize] += 1;
				}
			}
		}
		assert!(hits.iter().all(|&n| n == 1), "{}x{}", w, h);
	}
}

#[test]
fn uniform_images_render_exactly() {
	for &(w, h) in SHAPES {
		let img = RgbImage::from_pixel(w, h, Rgb([(w * 7) as u8, 99, (h * 3) as u8]));
		let tree = Quadtree::build(&img, 6, 1).unwrap().compress(0.).unwrap();
		assert_eq!(tree.count_nodes(), 1);
		assert_eq!(tree.to_image(false).unwrap(), img);
	}
}

#[test]
fn compress_is_idempotent() {
	let tree = Quadtree::build(&patches(40, 33), 6, 1).unwrap();
	for &k in &[0., 0.5, 2., 5., 10., 25., 60., 1e9] {
		let once = tree.compress(k).unwrap();
		let twice = once.compress(k).unwrap();
		assert_eq!(once, twice, "threshold {}", k);
	}
}

#[test]
fn higher_threshold_never_adds_nodes() {
	let tree = Quadtree::build(&patches(64, 48), 7, 1).unwrap();
	let mut last = tree.count_nodes();
	for step in 0..=100 {
		let count = tree.compress(step as f64 * 1.5).unwrap().count_nodes();
		assert!(count <= last, "threshold {}", step as f64 * 1.5);
		last = count;
	}
	assert_eq!(last, 1);
}

#[test]
fn node_count_is_bounded_by_full_tree() {
	for d in 0..6 {
		for &(w, h) in SHAPES {
			let tree = Quadtree::build(&noise(w, h, d), d, 1).unwrap();
			assert!(tree.count_nodes() <= max_num_nodes(d));
			assert!(tree.depth() <= d);
		}
	}
	// A noisy power-of-two square fills the tree completely
	let tree = Quadtree::build(&noise(32, 32, 1), 5, 1).unwrap();
	assert_eq!(tree.count_nodes(), max_num_nodes(5));
	assert_eq!(tree.compression_ratio(), 1.);
}

#[test]
fn threshold_at_root_error_collapses_everything() {
	let tree = Quadtree::build(&patches(40, 33), 6, 1).unwrap();
	let root = tree.root();
	let collapsed = tree.compress(root.error).unwrap();
	assert_eq!(collapsed.count_nodes(), 1);
	assert_eq!(collapsed.root().color, root.color);
	let img = collapsed.to_image(false).unwrap();
	assert!(img.pixels().all(|p| *p == root.color));
	// The source tree is untouched
	assert!(tree.count_nodes() > 1);
}

#[test]
fn red_blue_halves_reduce_to_uniform_quadrants() {
	let red = Rgb([255, 0, 0]);
	let blue = Rgb([0, 0, 255]);
	let img = RgbImage::from_fn(4, 4, |x, _| if x < 2 { red } else { blue });
	let tree = Quadtree::build(&img, 2, 1).unwrap().compress(0.).unwrap();

	// Quadrant splitting cannot produce the 4x2 halves directly; each half
	// ends up as two uniform 2x2 leaves and nothing below them.
	let leaves: Vec<_> = tree.leaves().collect();
	assert_eq!(leaves.len(), 4);
	assert_eq!(tree.count_nodes(), 5);
	for leaf in &leaves {
		let expected = if leaf.region.col_end <= 2 { red } else { blue };
		assert_eq!(leaf.color, expected);
		assert_eq!(leaf.error, 0.);
	}
	let left: u64 = leaves.iter().filter(|l| l.color == red).map(|l| l.region.area()).sum();
	assert_eq!(left, 8);
	assert_eq!(tree.leaf_at(3, 1).map(|l| l.region), Some(Region::new(2, 4, 0, 2, 1).unwrap()));
	assert_eq!(tree.to_image(false).unwrap(), img);
}
