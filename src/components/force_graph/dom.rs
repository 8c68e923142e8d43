use web_sys::{Document, Element};

use super::scene::{
	LINK_STROKE, LINK_STROKE_OPACITY, MARKER_PATH, MARKER_REF_X, MARKER_SIZE, MARKER_VIEW_BOX,
	NODE_STROKE, NODE_STROKE_WIDTH, ClientRect, Scene, ViewBox,
};
use super::surface::Surface;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Draws scenes as SVG inside a host element.
pub struct SvgSurface {
	host: Element,
	view_box: Option<ViewBox>,
	lines: Vec<Element>,
	circles: Vec<Element>,
}

impl SvgSurface {
	/// Draw inside `host`. The host's existing children are replaced on mount.
	pub fn new(host: Element) -> Self {
		Self {
			host,
			view_box: None,
			lines: Vec::new(),
			circles: Vec::new(),
		}
	}

	fn build(&mut self, document: &Document, scene: &Scene) -> Option<Element> {
		let svg = create(document, "svg")?;
		set(&svg, "viewBox", &scene.view_box.attr());

		if let Some(marker) = &scene.marker {
			let defs = create(document, "defs")?;
			let shape = create(document, "marker")?;
			set(&shape, "id", &marker.id);
			set(&shape, "viewBox", MARKER_VIEW_BOX);
			set(&shape, "refX", &MARKER_REF_X.to_string());
			set(&shape, "refY", "0");
			set(&shape, "markerWidth", &MARKER_SIZE.to_string());
			set(&shape, "markerHeight", &MARKER_SIZE.to_string());
			set(&shape, "orient", "auto");
			let path = create(document, "path")?;
			set(&path, "d", MARKER_PATH);
			set(&path, "fill", LINK_STROKE);
			append(&shape, &path);
			append(&defs, &shape);
			append(&svg, &defs);
		}

		let link_group = create(document, "g")?;
		set(&link_group, "stroke", LINK_STROKE);
		set(&link_group, "stroke-opacity", &LINK_STROKE_OPACITY.to_string());
		let marker_end = scene.marker.as_ref().map(|marker| marker.url());
		for line in &scene.links {
			let el = create(document, "line")?;
			set(&el, "stroke-width", &line.stroke_width.to_string());
			if let Some(url) = &marker_end {
				set(&el, "marker-end", url);
			}
			append(&link_group, &el);
			self.lines.push(el);
		}
		append(&svg, &link_group);

		let node_group = create(document, "g")?;
		set(&node_group, "stroke", NODE_STROKE);
		set(&node_group, "stroke-width", &NODE_STROKE_WIDTH.to_string());
		for circle in &scene.nodes {
			let el = create(document, "circle")?;
			set(&el, "r", &circle.radius.to_string());
			set(&el, "fill", circle.fill);
			let title = create(document, "title")?;
			title.set_text_content(Some(&circle.title));
			append(&el, &title);
			append(&node_group, &el);
			self.circles.push(el);
		}
		append(&svg, &node_group);

		Some(svg)
	}
}

fn create(document: &Document, tag: &str) -> Option<Element> {
	document
		.create_element_ns(Some(SVG_NS), tag)
		.inspect_err(|err| log::warn!("failed to create <{tag}>: {err:?}"))
		.ok()
}

fn set(el: &Element, name: &str, value: &str) {
	let _ = el.set_attribute(name, value);
}

fn append(parent: &Element, child: &Element) {
	let _ = parent.append_child(child);
}

impl Surface for SvgSurface {
	fn clear(&mut self) {
		self.host.set_inner_html("");
		self.view_box = None;
		self.lines.clear();
		self.circles.clear();
	}

	fn mount(&mut self, scene: &Scene) {
		self.clear();
		let Some(document) = self.host.owner_document() else {
			log::warn!("graph host is detached from any document");
			return;
		};
		match self.build(&document, scene) {
			Some(svg) => {
				append(&self.host, &svg);
				self.view_box = Some(scene.view_box);
				self.update(scene);
			}
			None => self.clear(),
		}
	}

	fn update(&mut self, scene: &Scene) {
		for (el, line) in self.lines.iter().zip(&scene.links) {
			set(el, "x1", &line.x1.to_string());
			set(el, "y1", &line.y1.to_string());
			set(el, "x2", &line.x2.to_string());
			set(el, "y2", &line.y2.to_string());
		}
		for (el, circle) in self.circles.iter().zip(&scene.nodes) {
			set(el, "cx", &circle.cx.to_string());
			set(el, "cy", &circle.cy.to_string());
		}
	}

	fn client_to_scene(&self, client_x: f64, client_y: f64) -> Option<(f64, f64)> {
		let view_box = self.view_box?;
		let rect = self.host.first_element_child()?.get_bounding_client_rect();
		let rect = ClientRect {
			left: rect.left(),
			top: rect.top(),
			width: rect.width(),
			height: rect.height(),
		};
		view_box.client_to_scene(rect, client_x, client_y)
	}
}
