//! Force simulation with explicit state threading.
//!
//! [`Simulation`] holds the immutable parts of a layout (resolved links,
//! force configuration, centering target). [`SimulationState`] holds the
//! positions, velocities and alpha, and is advanced by the pure
//! [`Simulation::step`]. Dragged nodes live in a separate [`PinOverlay`].

mod forces;
mod quadtree;

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;

pub use forces::ResolvedLink;
use forces::ManyBodyParams;

use super::error::{GraphError, LinkEnd};
use super::types::{GraphData, NodeId};

const INITIAL_RADIUS: f64 = 10.0;

/// Live position and velocity of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimNode {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
}

/// Everything a tick mutates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationState {
	/// Nodes in dataset order.
	pub nodes: Vec<SimNode>,
	/// Remaining energy.
	pub alpha: f64,
	/// Value alpha relaxes toward; raised while a drag is active.
	pub alpha_target: f64,
}

/// How the layout is kept in view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Centering {
	/// Translate the whole layout so its centroid sits on the target.
	Centroid {
		/// Fraction of the centroid offset removed per tick.
		strength: f64,
	},
	/// Pull every node toward `x = 0` and `y = 0` independently.
	Axis {
		/// Per-node spring strength, scaled by alpha.
		strength: f64,
	},
}

/// Rest length policy for links.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinkDistance {
	/// Same rest length for every link.
	Fixed(f64),
	/// `base + per_log_degree * ln(max(degree(source), degree(target)))`.
	Degree {
		/// Rest length between two leaves.
		base: f64,
		/// Growth per natural-log unit of the busier endpoint's degree.
		per_log_degree: f64,
	},
}

impl LinkDistance {
	fn for_degrees(self, source: usize, target: usize) -> f64 {
		match self {
			Self::Fixed(distance) => distance,
			Self::Degree {
				base,
				per_log_degree,
			} => base + per_log_degree * (source.max(target).max(1) as f64).ln(),
		}
	}
}

/// Force and cooling parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceConfig {
	/// Link rest lengths.
	pub link_distance: LinkDistance,
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
	/// Barnes-Hut opening angle.
	pub theta: f64,
	/// Distances below this are clamped when computing repulsion.
	pub distance_min: f64,
	/// Centering mode.
	pub centering: Centering,
	/// Ticking stops once alpha falls below this.
	pub alpha_min: f64,
	/// Fraction of the gap to `alpha_target` closed per tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target while at least one node is dragged.
	pub drag_alpha_target: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self::centroid()
	}
}

impl ForceConfig {
	/// Single centroid pull toward the viewport center. Suits small graphs.
	pub fn centroid() -> Self {
		Self {
			link_distance: LinkDistance::Degree {
				base: 30.0,
				per_log_degree: 10.0,
			},
			charge_strength: -30.0,
			theta: 0.9,
			distance_min: 1.0,
			centering: Centering::Centroid { strength: 1.0 },
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
		}
	}

	/// Axis pulls with weaker repulsion, for a more spread-out layout of
	/// dense graphs.
	pub fn axis() -> Self {
		Self {
			charge_strength: -12.0,
			centering: Centering::Axis { strength: 0.1 },
			..Self::centroid()
		}
	}
}

/// Fixed coordinates for dragged nodes, keyed by node index. Pinned nodes
/// skip integration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PinOverlay {
	pins: BTreeMap<usize, (f64, f64)>,
}

impl PinOverlay {
	/// Pin (or move the pin of) node `index`.
	pub fn pin(&mut self, index: usize, at: (f64, f64)) {
		self.pins.insert(index, at);
	}

	/// Release node `index`, returning its last pin.
	pub fn unpin(&mut self, index: usize) -> Option<(f64, f64)> {
		self.pins.remove(&index)
	}

	/// Pin for node `index`, if any.
	pub fn get(&self, index: usize) -> Option<(f64, f64)> {
		self.pins.get(&index).copied()
	}

	/// True when node `index` is pinned.
	pub fn contains(&self, index: usize) -> bool {
		self.pins.contains_key(&index)
	}

	/// True when nothing is pinned.
	pub fn is_empty(&self) -> bool {
		self.pins.is_empty()
	}

	/// Number of pinned nodes.
	pub fn len(&self) -> usize {
		self.pins.len()
	}
}

/// The immutable half of a force layout.
#[derive(Clone, Debug)]
pub struct Simulation {
	ids: Vec<NodeId>,
	index_by_id: HashMap<NodeId, usize>,
	links: Vec<ResolvedLink>,
	config: ForceConfig,
	center: (f64, f64),
}

impl Simulation {
	/// Resolve `data` and build the initial state, with nodes placed on a
	/// phyllotaxis spiral around `center`.
	///
	/// Fails on duplicate node ids and on links naming absent nodes.
	pub fn new(
		data: &GraphData,
		config: ForceConfig,
		center: (f64, f64),
	) -> Result<(Self, SimulationState), GraphError> {
		let mut index_by_id = HashMap::with_capacity(data.nodes.len());
		for (index, node) in data.nodes.iter().enumerate() {
			if index_by_id.insert(node.id.clone(), index).is_some() {
				return Err(GraphError::DuplicateNodeId(node.id.clone()));
			}
		}

		let mut ends = Vec::with_capacity(data.links.len());
		let mut degree = vec![0usize; data.nodes.len()];
		for (position, link) in data.links.iter().enumerate() {
			let resolve = |id: &NodeId, end| {
				index_by_id
					.get(id)
					.copied()
					.ok_or_else(|| GraphError::DanglingLinkReference {
						link: position,
						end,
						id: id.clone(),
					})
			};
			let source = resolve(&link.source, LinkEnd::Source)?;
			let target = resolve(&link.target, LinkEnd::Target)?;
			degree[source] += 1;
			degree[target] += 1;
			ends.push((source, target));
		}

		let links = ends
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source], degree[target]);
				ResolvedLink {
					source,
					target,
					distance: config.link_distance.for_degrees(ds, dt),
					strength: 1.0 / ds.min(dt) as f64,
					bias: ds as f64 / (ds + dt) as f64,
				}
			})
			.collect();

		let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
		let nodes = (0..data.nodes.len())
			.map(|i| {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden_angle;
				SimNode {
					x: center.0 + radius * angle.cos(),
					y: center.1 + radius * angle.sin(),
					vx: 0.0,
					vy: 0.0,
				}
			})
			.collect();

		let simulation = Self {
			ids: data.nodes.iter().map(|node| node.id.clone()).collect(),
			index_by_id,
			links,
			config,
			center,
		};
		let state = SimulationState {
			nodes,
			alpha: 1.0,
			alpha_target: 0.0,
		};
		Ok((simulation, state))
	}

	/// Advance `state` by one tick. All forces are summed before any
	/// position is committed.
	pub fn step(&self, mut state: SimulationState, pins: &PinOverlay) -> SimulationState {
		let config = &self.config;
		state.alpha += (state.alpha_target - state.alpha) * config.alpha_decay;
		let alpha = state.alpha;

		forces::apply_links(&self.links, &mut state.nodes, alpha);
		forces::apply_many_body(
			&mut state.nodes,
			ManyBodyParams {
				strength: config.charge_strength,
				theta_sq: config.theta * config.theta,
				distance_min_sq: config.distance_min * config.distance_min,
				alpha,
			},
		);
		match config.centering {
			Centering::Centroid { strength } => {
				forces::apply_centroid(&mut state.nodes, self.center, strength)
			}
			Centering::Axis { strength } => {
				forces::apply_axis(&mut state.nodes, self.center, strength, alpha)
			}
		}

		let friction = 1.0 - config.velocity_decay;
		for (index, node) in state.nodes.iter_mut().enumerate() {
			if let Some((fx, fy)) = pins.get(index) {
				node.x = fx;
				node.y = fy;
				node.vx = 0.0;
				node.vy = 0.0;
			} else {
				node.vx *= friction;
				node.vy *= friction;
				node.x += node.vx;
				node.y += node.vy;
			}
		}

		state
	}

	/// True once `state` has cooled below `alpha_min`.
	pub fn is_converged(&self, state: &SimulationState) -> bool {
		state.alpha < self.config.alpha_min
	}

	/// Step until converged or `max_ticks` is reached. Returns the final
	/// state and the number of ticks taken.
	pub fn run(
		&self,
		mut state: SimulationState,
		pins: &PinOverlay,
		max_ticks: usize,
	) -> (SimulationState, usize) {
		let mut ticks = 0;
		while ticks < max_ticks && !self.is_converged(&state) {
			state = self.step(state, pins);
			ticks += 1;
		}
		(state, ticks)
	}

	/// Index of node `id`.
	pub fn index_of(&self, id: &NodeId) -> Option<usize> {
		self.index_by_id.get(id).copied()
	}

	/// Id of the node at `index`.
	pub fn id_of(&self, index: usize) -> Option<&NodeId> {
		self.ids.get(index)
	}

	/// Resolved links in dataset order.
	pub fn links(&self) -> &[ResolvedLink] {
		&self.links
	}

	/// Force configuration.
	pub fn config(&self) -> &ForceConfig {
		&self.config
	}

	/// Centering target.
	pub fn center(&self) -> (f64, f64) {
		self.center
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![
				GraphNode::new(1, "a"),
				GraphNode::new(2, "a"),
				GraphNode::new(3, "b"),
			],
			links: vec![GraphLink::new(1, 2), GraphLink::new(2, 3)],
		}
	}

	fn star(spokes: i64) -> GraphData {
		let mut nodes = vec![GraphNode::new("hub", "location")];
		let mut links = Vec::new();
		for i in 0..spokes {
			nodes.push(GraphNode::new(i, "person"));
			links.push(GraphLink::new("hub", i));
		}
		GraphData { nodes, links }
	}

	fn min_pairwise_distance(state: &SimulationState) -> f64 {
		let mut min = f64::INFINITY;
		for (i, a) in state.nodes.iter().enumerate() {
			for b in &state.nodes[i + 1..] {
				min = min.min(((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt());
			}
		}
		min
	}

	#[test]
	fn test_dangling_target_is_rejected() {
		let mut data = sample();
		data.links.push(GraphLink::new(1, 99));
		let err = Simulation::new(&data, ForceConfig::default(), (0.0, 0.0)).unwrap_err();
		match err {
			GraphError::DanglingLinkReference { link, end, id } => {
				assert_eq!(link, 2);
				assert_eq!(end, LinkEnd::Target);
				assert_eq!(id, NodeId::Int(99));
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn test_dangling_source_is_rejected() {
		let mut data = sample();
		data.links.insert(0, GraphLink::new("1", 2));
		let err = Simulation::new(&data, ForceConfig::default(), (0.0, 0.0)).unwrap_err();
		assert!(matches!(
			err,
			GraphError::DanglingLinkReference {
				link: 0,
				end: LinkEnd::Source,
				..
			}
		));
	}

	#[test]
	fn test_duplicate_id_is_rejected() {
		let mut data = sample();
		data.nodes.push(GraphNode::new(2, "b"));
		let err = Simulation::new(&data, ForceConfig::default(), (0.0, 0.0)).unwrap_err();
		assert!(matches!(err, GraphError::DuplicateNodeId(NodeId::Int(2))));
	}

	#[test]
	fn test_initial_state_surrounds_center() {
		let (simulation, state) =
			Simulation::new(&sample(), ForceConfig::default(), (250.0, 125.0)).unwrap();
		assert_eq!(state.alpha, 1.0);
		assert_eq!(state.nodes.len(), 3);
		for node in &state.nodes {
			assert!((node.x - 250.0).abs() < 30.0);
			assert!((node.y - 125.0).abs() < 30.0);
		}
		assert_eq!(simulation.index_of(&NodeId::Int(3)), Some(2));
		assert_eq!(simulation.id_of(0), Some(&NodeId::Int(1)));
	}

	#[test]
	fn test_link_constants_follow_degree() {
		let (simulation, _) = Simulation::new(&star(8), ForceConfig::default(), (0.0, 0.0)).unwrap();
		let link = &simulation.links()[0];
		assert_eq!(link.strength, 1.0);
		assert!((link.bias - 8.0 / 9.0).abs() < 1e-12);
		assert!((link.distance - (30.0 + 10.0 * 8.0_f64.ln())).abs() < 1e-9);

		let config = ForceConfig {
			link_distance: LinkDistance::Fixed(42.0),
			..ForceConfig::default()
		};
		let (simulation, _) = Simulation::new(&star(8), config, (0.0, 0.0)).unwrap();
		assert!(simulation.links().iter().all(|link| link.distance == 42.0));
	}

	#[test]
	fn test_converges_and_keeps_nodes_apart() {
		let (simulation, state) = Simulation::new(&star(12), ForceConfig::default(), (250.0, 125.0)).unwrap();
		let (state, ticks) = simulation.run(state, &PinOverlay::default(), 1000);
		assert!(simulation.is_converged(&state));
		assert!(ticks < 400);
		assert!(min_pairwise_distance(&state) > 1.0);
	}

	#[test]
	fn test_centroid_settles_on_center() {
		let (simulation, state) = Simulation::new(&sample(), ForceConfig::centroid(), (250.0, 125.0)).unwrap();
		let (state, _) = simulation.run(state, &PinOverlay::default(), 1000);
		let n = state.nodes.len() as f64;
		let cx = state.nodes.iter().map(|node| node.x).sum::<f64>() / n;
		let cy = state.nodes.iter().map(|node| node.y).sum::<f64>() / n;
		assert!((cx - 250.0).abs() < 1.0);
		assert!((cy - 125.0).abs() < 1.0);
	}

	#[test]
	fn test_axis_layout_stays_near_origin() {
		let (simulation, state) = Simulation::new(&star(20), ForceConfig::axis(), (0.0, 0.0)).unwrap();
		let (state, _) = simulation.run(state, &PinOverlay::default(), 1000);
		let n = state.nodes.len() as f64;
		let cx = state.nodes.iter().map(|node| node.x).sum::<f64>() / n;
		let cy = state.nodes.iter().map(|node| node.y).sum::<f64>() / n;
		assert!(cx.abs() < 25.0 && cy.abs() < 25.0);
		assert!(min_pairwise_distance(&state) > 1.0);
	}

	#[test]
	fn test_pinned_node_skips_integration() {
		let (simulation, mut state) =
			Simulation::new(&sample(), ForceConfig::default(), (250.0, 125.0)).unwrap();
		let mut pins = PinOverlay::default();
		pins.pin(1, (50.0, 80.0));
		let before = state.nodes[0];
		for _ in 0..10 {
			state = simulation.step(state, &pins);
			assert_eq!((state.nodes[1].x, state.nodes[1].y), (50.0, 80.0));
			assert_eq!((state.nodes[1].vx, state.nodes[1].vy), (0.0, 0.0));
		}
		assert_ne!(state.nodes[0], before);
	}

	#[test]
	fn test_alpha_relaxes_toward_target() {
		let (simulation, mut state) =
			Simulation::new(&sample(), ForceConfig::default(), (0.0, 0.0)).unwrap();
		state.alpha = 0.0;
		state.alpha_target = 0.3;
		state = simulation.step(state, &PinOverlay::default());
		assert!(state.alpha > 0.0 && state.alpha < 0.3);
		assert!(!simulation.is_converged(&state));
	}

	#[test]
	fn test_pin_overlay() {
		let mut pins = PinOverlay::default();
		assert!(pins.is_empty());
		pins.pin(3, (1.0, 2.0));
		pins.pin(3, (4.0, 5.0));
		assert_eq!(pins.len(), 1);
		assert!(pins.contains(3));
		assert_eq!(pins.unpin(3), Some((4.0, 5.0)));
		assert_eq!(pins.unpin(3), None);
	}
}
