use std::fmt;

use serde::Deserialize;

use super::error::GraphError;

/// Node identifier. Integer and string ids never compare equal, so `1` and
/// `"1"` name different nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
	/// Numeric id, e.g. an A number.
	Int(i64),
	/// Free-form id, e.g. a location name.
	Str(String),
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(n) => write!(f, "{n}"),
			Self::Str(s) => f.write_str(s),
		}
	}
}

impl From<i64> for NodeId {
	fn from(n: i64) -> Self {
		Self::Int(n)
	}
}

impl From<i32> for NodeId {
	fn from(n: i32) -> Self {
		Self::Int(n.into())
	}
}

impl From<&str> for NodeId {
	fn from(s: &str) -> Self {
		Self::Str(s.to_owned())
	}
}

impl From<String> for NodeId {
	fn from(s: String) -> Self {
		Self::Str(s)
	}
}

/// A graph vertex. `kind` only drives color classification.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Unique id within the dataset.
	pub id: NodeId,
	/// Category tag.
	#[serde(rename = "type")]
	pub kind: String,
}

impl GraphNode {
	/// Shorthand used by hand-authored datasets.
	pub fn new(id: impl Into<NodeId>, kind: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			kind: kind.into(),
		}
	}
}

/// A graph edge between two node ids.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	/// Id of the source node.
	pub source: NodeId,
	/// Id of the target node.
	pub target: NodeId,
	/// Optional weight, drawn as stroke thickness.
	#[serde(default)]
	pub value: Option<f64>,
}

impl GraphLink {
	/// An unweighted link.
	pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			value: None,
		}
	}
}

/// Immutable input dataset. Renderers copy what they need and never mutate it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	/// Nodes in draw order.
	pub nodes: Vec<GraphNode>,
	/// Links in draw order.
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Decode a `{nodes, links}` JSON document. Only decoding happens here;
	/// link resolution is checked when the graph is rendered.
	pub fn from_json(json: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(json)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_mixed_ids_and_extra_fields() {
		let data = GraphData::from_json(
			r#"{
				"nodes": [
					{"id": "new york", "name": "new york", "type": "location"},
					{"id": 7001234, "anumber": 7001234, "type": "person"}
				],
				"links": [{"source": "new york", "target": 7001234, "value": 4}]
			}"#,
		)
		.unwrap();

		assert_eq!(data.nodes[0].id, NodeId::from("new york"));
		assert_eq!(data.nodes[1].id, NodeId::Int(7001234));
		assert_eq!(data.nodes[1].kind, "person");
		assert_eq!(data.links[0].value, Some(4.0));
	}

	#[test]
	fn test_int_and_string_ids_differ() {
		assert_ne!(NodeId::Int(1), NodeId::from("1"));
		assert_eq!(NodeId::Int(1).to_string(), "1");
	}

	#[test]
	fn test_missing_value_and_links() {
		let data = GraphData::from_json(r#"{"nodes": [{"id": 1, "type": "a"}]}"#).unwrap();
		assert!(data.links.is_empty());

		let data = GraphData::from_json(
			r#"{"nodes": [], "links": [{"source": 1, "target": 2}]}"#,
		)
		.unwrap();
		assert_eq!(data.links[0].value, None);
	}

	#[test]
	fn test_malformed_json() {
		let err = GraphData::from_json(r#"{"nodes": [{"id": 1}]}"#).unwrap_err();
		assert!(matches!(err, GraphError::Parse(_)));
	}
}
