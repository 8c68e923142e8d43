use super::scene::{ClientRect, Scene};

/// Where a renderer draws. Surface operations never fail; implementations
/// log and carry on.
pub trait Surface {
	/// Remove everything previously drawn.
	fn clear(&mut self);
	/// Replace the content with `scene`.
	fn mount(&mut self, scene: &Scene);
	/// Move already mounted elements to the positions in `scene`.
	fn update(&mut self, scene: &Scene);
	/// Map a pointer position in client pixels to scene coordinates.
	/// `None` while nothing is mounted.
	fn client_to_scene(&self, client_x: f64, client_y: f64) -> Option<(f64, f64)>;
}

/// Headless surface keeping a copy of the last drawn scene.
#[derive(Debug, Default)]
pub struct MemorySurface {
	scene: Option<Scene>,
	client_rect: Option<ClientRect>,
	mounts: usize,
	updates: usize,
}

impl MemorySurface {
	/// Pretend the drawing sits at `rect` on screen. Without one it sits at
	/// the client origin, one pixel per scene unit.
	pub fn with_client_rect(mut self, rect: ClientRect) -> Self {
		self.client_rect = Some(rect);
		self
	}

	/// The scene currently shown, if any.
	pub fn scene(&self) -> Option<&Scene> {
		self.scene.as_ref()
	}

	/// Number of drawn link and node elements.
	pub fn element_count(&self) -> usize {
		self.scene.as_ref().map_or(0, Scene::element_count)
	}

	/// How many times a scene was mounted.
	pub fn mounts(&self) -> usize {
		self.mounts
	}

	/// How many position updates were drawn.
	pub fn updates(&self) -> usize {
		self.updates
	}
}

impl Surface for MemorySurface {
	fn clear(&mut self) {
		self.scene = None;
	}

	fn mount(&mut self, scene: &Scene) {
		self.scene = Some(scene.clone());
		self.mounts += 1;
	}

	fn update(&mut self, scene: &Scene) {
		match &mut self.scene {
			Some(current) => current.clone_from(scene),
			None => {
				log::warn!("position update on an empty surface ignored");
				return;
			}
		}
		self.updates += 1;
	}

	fn client_to_scene(&self, client_x: f64, client_y: f64) -> Option<(f64, f64)> {
		let view_box = self.scene.as_ref()?.view_box;
		let rect = self.client_rect.unwrap_or(ClientRect {
			left: 0.0,
			top: 0.0,
			width: view_box.width,
			height: view_box.height,
		});
		view_box.client_to_scene(rect, client_x, client_y)
	}
}
