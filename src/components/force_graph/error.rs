use std::fmt;

use thiserror::Error;

use super::types::NodeId;

/// Which end of a link failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEnd {
	/// The `source` field.
	Source,
	/// The `target` field.
	Target,
}

impl fmt::Display for LinkEnd {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Source => "source",
			Self::Target => "target",
		})
	}
}

/// Errors raised while loading or rendering a graph.
#[derive(Error, Debug)]
pub enum GraphError {
	/// Width or height is not a finite positive number.
	#[error("invalid viewport {width}x{height}: both dimensions must be positive")]
	InvalidDimension {
		/// Requested width.
		width: f64,
		/// Requested height.
		height: f64,
	},

	/// A link names a node id that is not in the node list.
	#[error("link {link} references unknown {end} node `{id}`")]
	DanglingLinkReference {
		/// Position of the offending link.
		link: usize,
		/// The unresolved end.
		end: LinkEnd,
		/// The id that could not be found.
		id: NodeId,
	},

	/// Two nodes share one id.
	#[error("duplicate node id `{0}`")]
	DuplicateNodeId(NodeId),

	/// The dataset JSON could not be decoded.
	#[error("failed to parse graph data: {0}")]
	Parse(#[from] serde_json::Error),
}
