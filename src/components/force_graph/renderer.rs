use std::cell::{Ref, RefCell};
use std::rc::Rc;

use super::error::GraphError;
use super::state::{GraphHandle, LiveGraph, RenderOptions};
use super::surface::Surface;
use super::ticker::Ticker;
use super::types::{GraphData, NodeId};

struct Shared<S> {
	surface: S,
	graph: Option<LiveGraph>,
}

/// Lays out and draws one graph at a time on a surface, stepping the
/// simulation once per frame of its ticker until it cools down.
pub struct ForceGraphRenderer<S: Surface + 'static, T: Ticker> {
	name: String,
	shared: Rc<RefCell<Shared<S>>>,
	ticker: T,
	options: RenderOptions,
	next_handle: u64,
}

impl<S: Surface + 'static, T: Ticker> ForceGraphRenderer<S, T> {
	/// `name` must be unique among renderers sharing a page; it prefixes
	/// element ids such as the arrowhead marker.
	pub fn new(name: impl Into<String>, surface: S, ticker: T, options: RenderOptions) -> Self {
		Self {
			name: name.into(),
			shared: Rc::new(RefCell::new(Shared {
				surface,
				graph: None,
			})),
			ticker,
			options,
			next_handle: 0,
		}
	}

	/// Replace whatever is on the surface with a new layout of `data`.
	///
	/// Validation happens before anything is touched, so a rejected dataset
	/// leaves the previous graph running.
	pub fn render(&mut self, data: &GraphData, width: f64, height: f64) -> Result<GraphHandle, GraphError> {
		self.next_handle += 1;
		let handle = GraphHandle(self.next_handle);
		let graph = LiveGraph::new(
			handle,
			data,
			width,
			height,
			&self.options,
			format!("{}-arrow", self.name),
		)
		.inspect_err(|err| log::warn!("{}: render rejected: {err}", self.name))?;

		self.ticker.stop();
		{
			let mut shared = self.shared.borrow_mut();
			shared.surface.clear();
			shared.surface.mount(&graph.scene);
			shared.graph = Some(graph);
		}
		log::debug!(
			"{}: rendering {handle} with {} nodes and {} links at {width}x{height}",
			self.name,
			data.nodes.len(),
			data.links.len()
		);

		self.start_ticking(handle);
		Ok(handle)
	}

	/// Stop ticking and clear the surface. Stale handles and repeated calls
	/// are ignored.
	pub fn destroy(&mut self, handle: GraphHandle) {
		let mut shared = self.shared.borrow_mut();
		if shared.graph.as_ref().is_none_or(|graph| graph.handle != handle) {
			return;
		}
		self.ticker.stop();
		shared.graph = None;
		shared.surface.clear();
		log::debug!("{}: destroyed {handle}", self.name);
	}

	/// Pin node `id` at its current position and reheat the simulation.
	/// Returns false when the handle or node is unknown.
	pub fn drag_start(&mut self, handle: GraphHandle, id: &NodeId) -> bool {
		let started = self
			.with_graph(handle, |graph, _| {
				graph
					.simulation
					.index_of(id)
					.is_some_and(|index| graph.drag_start(index))
			})
			.unwrap_or(false);

		if started && !self.ticker.is_running() {
			log::debug!("{}: reheating {handle}", self.name);
			self.start_ticking(handle);
		}
		started
	}

	/// Move the pin of a dragged node to `(x, y)` in scene coordinates.
	pub fn drag_to(&mut self, handle: GraphHandle, id: &NodeId, x: f64, y: f64) {
		self.with_graph(handle, |graph, surface| {
			let Some(index) = graph.simulation.index_of(id) else {
				return;
			};
			if graph.drag_to(index, x, y) {
				surface.update(&graph.scene);
			}
		});
	}

	/// Release a dragged node back to the simulation.
	pub fn drag_end(&mut self, handle: GraphHandle, id: &NodeId) {
		self.with_graph(handle, |graph, _| {
			if let Some(index) = graph.simulation.index_of(id) {
				graph.drag_end(index);
			}
		});
	}

	/// Topmost node near a scene point.
	pub fn node_at(&self, handle: GraphHandle, x: f64, y: f64) -> Option<NodeId> {
		let shared = self.shared.borrow();
		let graph = shared.graph.as_ref().filter(|graph| graph.handle == handle)?;
		let index = graph.node_at_position(x, y)?;
		graph.simulation.id_of(index).cloned()
	}

	/// Current simulated position of node `id`.
	pub fn node_position(&self, handle: GraphHandle, id: &NodeId) -> Option<(f64, f64)> {
		let shared = self.shared.borrow();
		let graph = shared.graph.as_ref().filter(|graph| graph.handle == handle)?;
		graph.position(graph.simulation.index_of(id)?)
	}

	/// Handle of the graph on display.
	pub fn handle(&self) -> Option<GraphHandle> {
		self.shared.borrow().graph.as_ref().map(|graph| graph.handle)
	}

	/// True while the simulation is being stepped.
	pub fn is_running(&self) -> bool {
		self.ticker.is_running()
	}

	/// The surface being drawn on.
	pub fn surface(&self) -> Ref<'_, S> {
		Ref::map(self.shared.borrow(), |shared| &shared.surface)
	}

	fn with_graph<R>(&self, handle: GraphHandle, f: impl FnOnce(&mut LiveGraph, &mut S) -> R) -> Option<R> {
		let mut shared = self.shared.borrow_mut();
		let Shared { surface, graph } = &mut *shared;
		let graph = graph.as_mut().filter(|graph| graph.handle == handle)?;
		Some(f(graph, surface))
	}

	fn start_ticking(&mut self, handle: GraphHandle) {
		let shared = Rc::clone(&self.shared);
		let name = self.name.clone();
		self.ticker.start(Box::new(move || {
			let mut shared = shared.borrow_mut();
			let Shared { surface, graph } = &mut *shared;
			let Some(graph) = graph.as_mut().filter(|graph| graph.handle == handle) else {
				return false;
			};
			graph.tick();
			surface.update(&graph.scene);
			let running = graph.is_running();
			if !running {
				log::info!("{name}: {handle} converged");
			}
			running
		}));
	}
}

impl<S: Surface + 'static, T: Ticker> Drop for ForceGraphRenderer<S, T> {
	fn drop(&mut self) {
		self.ticker.stop();
		if let Ok(mut shared) = self.shared.try_borrow_mut() {
			if shared.graph.take().is_some() {
				shared.surface.clear();
			}
		}
	}
}
