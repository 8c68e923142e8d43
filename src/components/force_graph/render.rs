use super::palette::category_color;
use super::scene::{ArrowMarker, LinkLine, NodeCircle, Scene, ViewBox};
use super::simulation::{Simulation, SimulationState};
use super::types::GraphData;

/// Build the scene for a freshly resolved dataset at its initial positions.
pub fn build_scene(
	data: &GraphData,
	simulation: &Simulation,
	state: &SimulationState,
	view_box: ViewBox,
	marker: Option<ArrowMarker>,
	node_radius: f64,
) -> Scene {
	let links = simulation
		.links()
		.iter()
		.zip(&data.links)
		.map(|(resolved, link)| LinkLine {
			source: resolved.source,
			target: resolved.target,
			x1: 0.0,
			y1: 0.0,
			x2: 0.0,
			y2: 0.0,
			stroke_width: link.value.map(f64::sqrt).unwrap_or(1.0),
		})
		.collect();

	let nodes = data
		.nodes
		.iter()
		.enumerate()
		.map(|(index, node)| NodeCircle {
			node: index,
			cx: 0.0,
			cy: 0.0,
			radius: node_radius,
			fill: category_color(&node.kind),
			title: node.id.to_string(),
		})
		.collect();

	let mut scene = Scene {
		view_box,
		marker,
		links,
		nodes,
	};
	render(state, &mut scene);
	scene
}

/// Project the positions of `state` onto `scene`: every line endpoint
/// becomes the position of its resolved node.
pub fn render(state: &SimulationState, scene: &mut Scene) {
	for line in &mut scene.links {
		let (source, target) = (&state.nodes[line.source], &state.nodes[line.target]);
		line.x1 = source.x;
		line.y1 = source.y;
		line.x2 = target.x;
		line.y2 = target.y;
	}
	for circle in &mut scene.nodes {
		let node = &state.nodes[circle.node];
		circle.cx = node.x;
		circle.cy = node.y;
	}
}
