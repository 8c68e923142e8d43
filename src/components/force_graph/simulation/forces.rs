use super::SimNode;
use super::quadtree::QuadNode;

/// Link with both ends resolved to node indices and its per-link constants.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLink {
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
	/// Rest length.
	pub distance: f64,
	/// Spring stiffness, `1 / min(degree(source), degree(target))`.
	pub strength: f64,
	/// Share of the correction applied to the target end.
	pub bias: f64,
}

#[derive(Clone, Copy)]
pub(super) struct ManyBodyParams {
	pub(super) strength: f64,
	pub(super) theta_sq: f64,
	pub(super) distance_min_sq: f64,
	pub(super) alpha: f64,
}

/// Tiny, deterministic, antisymmetric nudge for exactly coincident points:
/// `jiggle(a, b, s) == -jiggle(b, a, s)`.
pub(super) fn jiggle(from: usize, to: usize, salt: usize) -> f64 {
	let (lo, hi) = if from < to { (from, to) } else { (to, from) };
	let seed = (lo as u64)
		.wrapping_mul(7919)
		.wrapping_add((hi as u64).wrapping_mul(104_729))
		.wrapping_add((salt as u64).wrapping_mul(31)) as f64;
	let magnitude = ((seed * 0.618_033_988_75).fract() * 0.5 + 0.5) * 1e-6;
	if from <= to { magnitude } else { -magnitude }
}

pub(super) fn apply_links(links: &[ResolvedLink], nodes: &mut [SimNode], alpha: f64) {
	for link in links {
		let (s, t) = (link.source, link.target);
		let mut dx = nodes[t].x + nodes[t].vx - nodes[s].x - nodes[s].vx;
		let mut dy = nodes[t].y + nodes[t].vy - nodes[s].y - nodes[s].vy;
		if dx == 0.0 {
			dx = jiggle(s, t, 0);
		}
		if dy == 0.0 {
			dy = jiggle(s, t, 1);
		}

		let length = (dx * dx + dy * dy).sqrt();
		let scale = (length - link.distance) / length * alpha * link.strength;
		dx *= scale;
		dy *= scale;

		nodes[t].vx -= dx * link.bias;
		nodes[t].vy -= dy * link.bias;
		nodes[s].vx += dx * (1.0 - link.bias);
		nodes[s].vy += dy * (1.0 - link.bias);
	}
}

pub(super) fn apply_many_body(nodes: &mut [SimNode], params: ManyBodyParams) {
	if nodes.len() < 2 || params.strength == 0.0 {
		return;
	}

	let positions: Vec<(f64, f64)> = nodes.iter().map(|node| (node.x, node.y)).collect();
	let Some(tree) = QuadNode::build(&positions) else {
		return;
	};

	for (index, node) in nodes.iter_mut().enumerate() {
		let mut force = (0.0, 0.0);
		accumulate_repulsion(&tree, index, &positions, params, &mut force);
		node.vx += force.0;
		node.vy += force.1;
	}
}

fn contribution(dx: f64, dy: f64, weight: f64, params: ManyBodyParams) -> (f64, f64) {
	let mut l = dx * dx + dy * dy;
	if l < params.distance_min_sq {
		l = (params.distance_min_sq * l).sqrt();
	}
	let scale = weight * params.alpha / l;
	(dx * scale, dy * scale)
}

fn accumulate_repulsion(
	node: &QuadNode,
	index: usize,
	positions: &[(f64, f64)],
	params: ManyBodyParams,
	force: &mut (f64, f64),
) {
	if node.mass <= 0.0 {
		return;
	}

	let (px, py) = positions[index];

	if node.is_leaf() {
		for &other in &node.indices {
			if other == index {
				continue;
			}
			let mut dx = positions[other].0 - px;
			let mut dy = positions[other].1 - py;
			if dx == 0.0 {
				dx = jiggle(index, other, 0);
			}
			if dy == 0.0 {
				dy = jiggle(index, other, 1);
			}
			let (fx, fy) = contribution(dx, dy, params.strength, params);
			force.0 += fx;
			force.1 += fy;
		}
		return;
	}

	let (dx, dy) = (node.center_of_mass.0 - px, node.center_of_mass.1 - py);
	let distance_sq = dx * dx + dy * dy;
	let side = node.bounds.side_length();
	if !node.bounds.contains((px, py)) && side * side / params.theta_sq < distance_sq {
		let (fx, fy) = contribution(dx, dy, params.strength * node.mass, params);
		force.0 += fx;
		force.1 += fy;
		return;
	}

	for child in node.children.iter().flatten() {
		accumulate_repulsion(child, index, positions, params, force);
	}
}

/// Shift every node so the centroid moves toward `(cx, cy)`.
pub(super) fn apply_centroid(nodes: &mut [SimNode], (cx, cy): (f64, f64), strength: f64) {
	if nodes.is_empty() {
		return;
	}
	let n = nodes.len() as f64;
	let (sx, sy) = nodes
		.iter()
		.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
	let (shift_x, shift_y) = ((sx / n - cx) * strength, (sy / n - cy) * strength);
	for node in nodes {
		node.x -= shift_x;
		node.y -= shift_y;
	}
}

/// Pull each node independently toward `x = x0` and `y = y0`.
pub(super) fn apply_axis(nodes: &mut [SimNode], (x0, y0): (f64, f64), strength: f64, alpha: f64) {
	for node in nodes {
		node.vx += (x0 - node.x) * strength * alpha;
		node.vy += (y0 - node.y) * strength * alpha;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(x: f64, y: f64) -> SimNode {
		SimNode {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
		}
	}

	fn params() -> ManyBodyParams {
		ManyBodyParams {
			strength: -30.0,
			theta_sq: 0.81,
			distance_min_sq: 1.0,
			alpha: 1.0,
		}
	}

	#[test]
	fn test_jiggle_is_antisymmetric_and_small() {
		for (a, b) in [(0, 1), (3, 9), (12, 4)] {
			assert_eq!(jiggle(a, b, 0), -jiggle(b, a, 0));
			assert!(jiggle(a, b, 1).abs() <= 1e-6);
			assert!(jiggle(a, b, 1) != 0.0);
		}
	}

	#[test]
	fn test_jiggle_handles_large_indices() {
		let (a, b) = (usize::MAX - 1, usize::MAX);
		assert_eq!(jiggle(a, b, 1), -jiggle(b, a, 1));
		assert!(jiggle(a, b, 1).abs() <= 1e-6);
		assert!(jiggle(a, b, 1) != 0.0);
		assert!(jiggle(50_000, 60_000, 0) != 0.0);
	}

	#[test]
	fn test_repulsion_pushes_pair_apart_symmetrically() {
		let mut nodes = vec![node(0.0, 0.0), node(10.0, 0.0)];
		apply_many_body(&mut nodes, params());
		assert!(nodes[0].vx < 0.0);
		assert!(nodes[1].vx > 0.0);
		assert!((nodes[0].vx + nodes[1].vx).abs() < 1e-12);
		assert!(nodes[0].vy.abs() < 1e-6);
		assert!((nodes[0].vy + nodes[1].vy).abs() < 1e-12);
	}

	#[test]
	fn test_coincident_nodes_get_separated() {
		let mut nodes = vec![node(4.0, 4.0), node(4.0, 4.0)];
		apply_many_body(&mut nodes, params());
		assert!(nodes[0].vx != 0.0 || nodes[0].vy != 0.0);
		assert!((nodes[0].vx + nodes[1].vx).abs() < 1e-9);
		assert!((nodes[0].vy + nodes[1].vy).abs() < 1e-9);
	}

	#[test]
	fn test_barnes_hut_matches_direct_sum_from_afar() {
		// A tight cluster far from a probe node is approximated as one body.
		let mut nodes: Vec<SimNode> = (0..40)
			.map(|i| node(500.0 + (i % 7) as f64, 500.0 + (i / 7) as f64))
			.collect();
		nodes.push(node(0.0, 0.0));
		let probe = nodes.len() - 1;

		let mut direct = (0.0, 0.0);
		for other in &nodes[..probe] {
			let (fx, fy) = contribution(other.x, other.y, -30.0, params());
			direct.0 += fx;
			direct.1 += fy;
		}

		apply_many_body(&mut nodes, params());
		let approx = (nodes[probe].vx, nodes[probe].vy);
		assert!((approx.0 - direct.0).abs() < direct.0.abs() * 0.05);
		assert!((approx.1 - direct.1).abs() < direct.1.abs() * 0.05);
	}

	#[test]
	fn test_link_pulls_stretched_pair_together() {
		let mut nodes = vec![node(0.0, 0.0), node(100.0, 0.0)];
		let links = [ResolvedLink {
			source: 0,
			target: 1,
			distance: 30.0,
			strength: 1.0,
			bias: 0.5,
		}];
		apply_links(&links, &mut nodes, 1.0);
		assert!(nodes[0].vx > 0.0);
		assert!(nodes[1].vx < 0.0);
		assert!((nodes[0].vx - 35.0).abs() < 1e-9);
	}

	#[test]
	fn test_centroid_and_axis() {
		let mut nodes = vec![node(0.0, 0.0), node(10.0, 20.0)];
		apply_centroid(&mut nodes, (250.0, 125.0), 1.0);
		assert_eq!((nodes[0].x + nodes[1].x) / 2.0, 250.0);
		assert_eq!((nodes[0].y + nodes[1].y) / 2.0, 125.0);

		let mut nodes = vec![node(10.0, -20.0)];
		apply_axis(&mut nodes, (0.0, 0.0), 0.1, 1.0);
		assert!((nodes[0].vx + 1.0).abs() < 1e-12);
		assert!((nodes[0].vy - 2.0).abs() < 1e-12);
	}
}
