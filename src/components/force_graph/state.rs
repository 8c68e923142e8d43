use std::fmt;

use super::error::GraphError;
use super::render;
use super::scene::{ArrowMarker, Scene, ViewBox};
use super::simulation::{Centering, ForceConfig, PinOverlay, Simulation, SimulationState};
use super::types::GraphData;

pub const HIT_RADIUS: f64 = 12.0;

/// Identifies one render of a renderer. Operations on a replaced or
/// destroyed handle are no-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphHandle(pub(super) u64);

impl fmt::Display for GraphHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Options fixed for the lifetime of a renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
	/// Simulation forces.
	pub forces: ForceConfig,
	/// Draw an arrowhead at the target end of every link.
	pub arrows: bool,
	/// Node circle radius.
	pub node_radius: f64,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			forces: ForceConfig::centroid(),
			arrows: false,
			node_radius: super::scene::NODE_RADIUS,
		}
	}
}

impl RenderOptions {
	/// Axis centering with weak repulsion, for the denser branch graphs.
	pub fn branch_and_link() -> Self {
		Self {
			forces: ForceConfig::axis(),
			..Self::default()
		}
	}
}

pub(super) fn check_dimensions(width: f64, height: f64) -> Result<(), GraphError> {
	let valid = |d: f64| d.is_finite() && d > 0.0;
	if valid(width) && valid(height) {
		Ok(())
	} else {
		Err(GraphError::InvalidDimension { width, height })
	}
}

/// Simulation, pins and scene of the graph currently on display.
pub(super) struct LiveGraph {
	pub handle: GraphHandle,
	pub simulation: Simulation,
	pub state: SimulationState,
	pub pins: PinOverlay,
	pub scene: Scene,
}

impl LiveGraph {
	pub fn new(
		handle: GraphHandle,
		data: &GraphData,
		width: f64,
		height: f64,
		options: &RenderOptions,
		marker_id: String,
	) -> Result<Self, GraphError> {
		check_dimensions(width, height)?;

		let (center, view_box) = match options.forces.centering {
			Centering::Centroid { .. } => (
				(width / 2.0, height / 2.0),
				ViewBox {
					min_x: 0.0,
					min_y: 0.0,
					width,
					height,
				},
			),
			Centering::Axis { .. } => (
				(0.0, 0.0),
				ViewBox {
					min_x: -width / 2.0,
					min_y: -height / 2.0,
					width,
					height,
				},
			),
		};

		let (simulation, state) = Simulation::new(data, options.forces, center)?;
		let marker = options.arrows.then(|| ArrowMarker { id: marker_id });
		let scene = render::build_scene(data, &simulation, &state, view_box, marker, options.node_radius);

		Ok(Self {
			handle,
			simulation,
			state,
			pins: PinOverlay::default(),
			scene,
		})
	}

	pub fn tick(&mut self) {
		let state = std::mem::take(&mut self.state);
		self.state = self.simulation.step(state, &self.pins);
		render::render(&self.state, &mut self.scene);
	}

	pub fn is_running(&self) -> bool {
		!self.simulation.is_converged(&self.state)
	}

	pub fn position(&self, index: usize) -> Option<(f64, f64)> {
		self.state.nodes.get(index).map(|node| (node.x, node.y))
	}

	/// Topmost node within [`HIT_RADIUS`] of a scene point.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		let mut found = None;
		for (index, node) in self.state.nodes.iter().enumerate() {
			let (dx, dy) = (node.x - x, node.y - y);
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(index);
			}
		}
		found
	}

	/// Pin `index` where it is. The first active drag raises the alpha target.
	pub fn drag_start(&mut self, index: usize) -> bool {
		let Some(at) = self.position(index) else {
			return false;
		};
		if self.pins.is_empty() {
			self.state.alpha_target = self.simulation.config().drag_alpha_target;
		}
		self.pins.pin(index, at);
		true
	}

	/// Move the pin of a dragged node and show it there right away.
	pub fn drag_to(&mut self, index: usize, x: f64, y: f64) -> bool {
		if !self.pins.contains(index) {
			return false;
		}
		self.pins.pin(index, (x, y));
		let node = &mut self.state.nodes[index];
		node.x = x;
		node.y = y;
		node.vx = 0.0;
		node.vy = 0.0;
		render::render(&self.state, &mut self.scene);
		true
	}

	/// Release `index`. The last release lets the simulation cool again.
	pub fn drag_end(&mut self, index: usize) -> bool {
		if self.pins.unpin(index).is_none() {
			return false;
		}
		if self.pins.is_empty() {
			self.state.alpha_target = 0.0;
		}
		true
	}
}
