//! Retained vector scene: one line per link, one circle per node, and at
//! most one arrowhead marker shared by every line.

use std::fmt::Write;

pub const NODE_RADIUS: f64 = 5.0;
pub const NODE_STROKE: &str = "#fff";
pub const NODE_STROKE_WIDTH: f64 = 1.5;
pub const LINK_STROKE: &str = "#999";
pub const LINK_STROKE_OPACITY: f64 = 0.6;

pub const MARKER_VIEW_BOX: &str = "0 -5 10 10";
pub const MARKER_PATH: &str = "M0,-5L10,0L0,5";
pub const MARKER_REF_X: f64 = 15.0;
pub const MARKER_SIZE: f64 = 6.0;

/// Visible region in scene coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
	/// Left edge.
	pub min_x: f64,
	/// Top edge.
	pub min_y: f64,
	/// Width.
	pub width: f64,
	/// Height.
	pub height: f64,
}

impl ViewBox {
	/// Value for an SVG `viewBox` attribute.
	pub fn attr(&self) -> String {
		format!("{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
	}

	/// Map a point in client pixels to scene coordinates, given where the
	/// drawing sits on screen. `None` while the drawing has no area.
	pub fn client_to_scene(&self, rect: ClientRect, client_x: f64, client_y: f64) -> Option<(f64, f64)> {
		if rect.width <= 0.0 || rect.height <= 0.0 {
			return None;
		}
		Some((
			self.min_x + (client_x - rect.left) * self.width / rect.width,
			self.min_y + (client_y - rect.top) * self.height / rect.height,
		))
	}
}

/// On-screen box of a drawing, in client pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientRect {
	/// Left edge.
	pub left: f64,
	/// Top edge.
	pub top: f64,
	/// Width.
	pub width: f64,
	/// Height.
	pub height: f64,
}

/// Arrowhead definition referenced by `marker-end` on every line.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowMarker {
	/// Element id, unique per page.
	pub id: String,
}

impl ArrowMarker {
	/// `url(#id)` reference.
	pub fn url(&self) -> String {
		format!("url(#{})", self.id)
	}
}

/// Drawn link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkLine {
	/// Source node index.
	pub source: usize,
	/// Target node index.
	pub target: usize,
	/// Source end, x.
	pub x1: f64,
	/// Source end, y.
	pub y1: f64,
	/// Target end, x.
	pub x2: f64,
	/// Target end, y.
	pub y2: f64,
	/// `sqrt(value)`, or 1 when the link has no value.
	pub stroke_width: f64,
}

/// Drawn node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeCircle {
	/// Node index.
	pub node: usize,
	/// Center x.
	pub cx: f64,
	/// Center y.
	pub cy: f64,
	/// Radius.
	pub radius: f64,
	/// Fill color from the category palette.
	pub fill: &'static str,
	/// Hover label, the raw node id.
	pub title: String,
}

/// Everything one graph draws.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
	/// Visible region.
	pub view_box: ViewBox,
	/// Shared arrowhead, when enabled.
	pub marker: Option<ArrowMarker>,
	/// Lines, drawn first.
	pub links: Vec<LinkLine>,
	/// Circles, drawn over the lines.
	pub nodes: Vec<NodeCircle>,
}

impl Scene {
	/// Number of drawn link and node elements. The marker definition is not
	/// counted.
	pub fn element_count(&self) -> usize {
		self.links.len() + self.nodes.len()
	}

	/// Standalone SVG markup for the current positions.
	pub fn to_svg(&self) -> String {
		let mut out = String::new();
		let _ = write!(
			out,
			r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}">"#,
			self.view_box.attr()
		);

		if let Some(marker) = &self.marker {
			let _ = write!(
				out,
				r#"<defs><marker id="{}" viewBox="{MARKER_VIEW_BOX}" refX="{MARKER_REF_X}" refY="0" markerWidth="{MARKER_SIZE}" markerHeight="{MARKER_SIZE}" orient="auto"><path d="{MARKER_PATH}" fill="{LINK_STROKE}"/></marker></defs>"#,
				escape(&marker.id)
			);
		}

		let marker_end = self
			.marker
			.as_ref()
			.map(|marker| format!(r#" marker-end="{}""#, escape(&marker.url())))
			.unwrap_or_default();
		let _ = write!(
			out,
			r#"<g stroke="{LINK_STROKE}" stroke-opacity="{LINK_STROKE_OPACITY}">"#
		);
		for line in &self.links {
			let _ = write!(
				out,
				r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke-width="{}"{marker_end}/>"#,
				line.x1, line.y1, line.x2, line.y2, line.stroke_width
			);
		}
		out.push_str("</g>");

		let _ = write!(
			out,
			r#"<g stroke="{NODE_STROKE}" stroke-width="{NODE_STROKE_WIDTH}">"#
		);
		for circle in &self.nodes {
			let _ = write!(
				out,
				r#"<circle cx="{}" cy="{}" r="{}" fill="{}"><title>{}</title></circle>"#,
				circle.cx,
				circle.cy,
				circle.radius,
				circle.fill,
				escape(&circle.title)
			);
		}
		out.push_str("</g></svg>");
		out
	}
}

fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			_ => out.push(c),
		}
	}
	out
}
