//! Force-directed graph layout, drawing and drag interaction.

mod binding;
mod component;
mod dom;
mod error;
mod palette;
mod render;
mod renderer;
mod scene;
mod simulation;
mod state;
mod surface;
mod ticker;
mod types;

pub use component::{ForceGraph, HEIGHT, WIDTH};
pub use dom::SvgSurface;
pub use error::{GraphError, LinkEnd};
pub use palette::{COLORS, category_color, color_for};
pub use renderer::ForceGraphRenderer;
pub use scene::{ArrowMarker, ClientRect, LinkLine, NodeCircle, Scene, ViewBox};
pub use simulation::{
	Centering, ForceConfig, LinkDistance, PinOverlay, ResolvedLink, SimNode, Simulation,
	SimulationState,
};
pub use state::{GraphHandle, RenderOptions};
pub use surface::{MemorySurface, Surface};
pub use ticker::{AnimationFrameTicker, FrameCallback, ManualTicker, Ticker};
pub use types::{GraphData, GraphLink, GraphNode, NodeId};
