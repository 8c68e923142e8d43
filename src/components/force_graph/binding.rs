use super::renderer::ForceGraphRenderer;
use super::surface::Surface;
use super::ticker::Ticker;
use super::types::NodeId;

/// Renderer plus the node under the pointer, shared by the event handlers.
/// Pointer positions arrive in client pixels.
pub(super) struct DragBinding<S: Surface + 'static, T: Ticker> {
	pub(super) renderer: Option<ForceGraphRenderer<S, T>>,
	pub(super) dragging: Option<NodeId>,
}

impl<S: Surface + 'static, T: Ticker> Default for DragBinding<S, T> {
	fn default() -> Self {
		Self {
			renderer: None,
			dragging: None,
		}
	}
}

impl<S: Surface + 'static, T: Ticker> DragBinding<S, T> {
	/// Start dragging the node under the pointer. Returns true when a drag began.
	pub(super) fn press(&mut self, client_x: f64, client_y: f64) -> bool {
		self.release();
		let Some(renderer) = self.renderer.as_mut() else {
			return false;
		};
		let Some(handle) = renderer.handle() else {
			return false;
		};
		let Some((x, y)) = renderer.surface().client_to_scene(client_x, client_y) else {
			return false;
		};
		let Some(id) = renderer.node_at(handle, x, y) else {
			return false;
		};
		if renderer.drag_start(handle, &id) {
			self.dragging = Some(id);
		}
		self.dragging.is_some()
	}

	/// Move the dragged node to the pointer. Returns true while a drag is active.
	pub(super) fn drag(&mut self, client_x: f64, client_y: f64) -> bool {
		let (Some(renderer), Some(id)) = (self.renderer.as_mut(), self.dragging.as_ref()) else {
			return false;
		};
		let Some(handle) = renderer.handle() else {
			return false;
		};
		let point = renderer.surface().client_to_scene(client_x, client_y);
		if let Some((x, y)) = point {
			renderer.drag_to(handle, id, x, y);
		}
		true
	}

	/// End the drag, whether the pointer was lifted or the gesture cancelled.
	pub(super) fn release(&mut self) {
		let Some(id) = self.dragging.take() else {
			return;
		};
		if let Some(renderer) = self.renderer.as_mut() {
			if let Some(handle) = renderer.handle() {
				renderer.drag_end(handle, &id);
			}
		}
	}

	pub(super) fn teardown(&mut self) {
		self.dragging = None;
		if let Some(mut renderer) = self.renderer.take() {
			if let Some(handle) = renderer.handle() {
				renderer.destroy(handle);
			}
		}
	}
}
