const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct Bounds {
	pub(super) cx: f64,
	pub(super) cy: f64,
	pub(super) half_extent: f64,
}

impl Bounds {
	fn from_points(points: &[(f64, f64)]) -> Option<Self> {
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in points {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}

		if !min_x.is_finite() || !min_y.is_finite() || !max_x.is_finite() || !max_y.is_finite() {
			return None;
		}

		let span = (max_x - min_x).max(max_y - min_y).max(1.0);
		Some(Self {
			cx: (min_x + max_x) * 0.5,
			cy: (min_y + max_y) * 0.5,
			half_extent: span * 0.5 + 1.0,
		})
	}

	pub(super) fn contains(self, (x, y): (f64, f64)) -> bool {
		(x - self.cx).abs() <= self.half_extent && (y - self.cy).abs() <= self.half_extent
	}

	pub(super) fn side_length(self) -> f64 {
		self.half_extent * 2.0
	}

	fn child(self, quadrant: usize) -> Self {
		let quarter = self.half_extent * 0.5;
		let (ox, oy) = match quadrant {
			0 => (-quarter, -quarter),
			1 => (quarter, -quarter),
			2 => (-quarter, quarter),
			_ => (quarter, quarter),
		};
		Self {
			cx: self.cx + ox,
			cy: self.cy + oy,
			half_extent: quarter,
		}
	}

	fn quadrant_for(self, (x, y): (f64, f64)) -> usize {
		match (x >= self.cx, y >= self.cy) {
			(false, false) => 0,
			(true, false) => 1,
			(false, true) => 2,
			(true, true) => 3,
		}
	}
}

/// Barnes-Hut cell. Leaves keep their point indices; inner cells only keep
/// the aggregate mass and center of mass.
pub(super) struct QuadNode {
	pub(super) bounds: Bounds,
	pub(super) center_of_mass: (f64, f64),
	pub(super) mass: f64,
	pub(super) indices: Vec<usize>,
	pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
	pub(super) fn build(positions: &[(f64, f64)]) -> Option<Self> {
		let bounds = Bounds::from_points(positions)?;
		let indices = (0..positions.len()).collect();
		Some(Self::build_node(bounds, indices, positions, 0))
	}

	fn build_node(bounds: Bounds, indices: Vec<usize>, positions: &[(f64, f64)], depth: usize) -> Self {
		let (mut sx, mut sy) = (0.0, 0.0);
		for &index in &indices {
			sx += positions[index].0;
			sy += positions[index].1;
		}
		let mass = indices.len() as f64;
		let center_of_mass = if mass > 0.0 { (sx / mass, sy / mass) } else { (bounds.cx, bounds.cy) };

		let mut node = Self {
			bounds,
			center_of_mass,
			mass,
			indices,
			children: std::array::from_fn(|_| None),
		};

		if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
			return node;
		}

		let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
		for &index in &node.indices {
			buckets[bounds.quadrant_for(positions[index])].push(index);
		}

		// Coincident points never split; keep them in one leaf.
		if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
			return node;
		}

		for (quadrant, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			node.children[quadrant] = Some(Box::new(Self::build_node(
				bounds.child(quadrant),
				bucket,
				positions,
				depth + 1,
			)));
		}
		node.indices.clear();
		node
	}

	pub(super) fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn leaf_count(node: &QuadNode) -> usize {
		if node.is_leaf() {
			return node.indices.len();
		}
		node.children.iter().flatten().map(|child| leaf_count(child)).sum()
	}

	#[test]
	fn test_every_point_lands_in_a_leaf() {
		let positions: Vec<(f64, f64)> = (0..100)
			.map(|i| ((i % 10) as f64 * 13.0, (i / 10) as f64 * 7.0))
			.collect();
		let tree = QuadNode::build(&positions).unwrap();
		assert!(!tree.is_leaf());
		assert_eq!(tree.mass, 100.0);
		assert_eq!(leaf_count(&tree), 100);
	}

	#[test]
	fn test_coincident_points_stay_in_one_leaf() {
		let positions = vec![(5.0, 5.0); 20];
		let tree = QuadNode::build(&positions).unwrap();
		assert!(tree.is_leaf());
		assert_eq!(tree.indices.len(), 20);
		assert_eq!(tree.center_of_mass, (5.0, 5.0));
	}

	#[test]
	fn test_empty_and_non_finite() {
		assert!(QuadNode::build(&[]).is_none());
		assert!(QuadNode::build(&[(f64::NAN, 0.0)]).is_none());
	}
}
