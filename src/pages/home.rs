use std::collections::BTreeSet;

use leptos::prelude::*;

use crate::components::force_graph::{ForceGraph, GraphData, GraphLink, GraphNode, RenderOptions};

const HUB: &str = "New York";
const FIRST_ANUM: i64 = 7_100_000;
const SEQUENTIAL_GAP: i64 = 1000;

fn sequential_sample() -> GraphData {
	GraphData::from_json(include_str!("../../assets/sequential_sample.json")).unwrap_or_else(|err| {
		log::error!("bundled sequential sample is invalid: {err}");
		GraphData::default()
	})
}

/// Branch & link sample: one location hub, `people` increasing A numbers,
/// links between neighbours closer than [`SEQUENTIAL_GAP`], and hub links
/// only to the first number of each chain. People outside any chain are
/// left out.
fn branch_and_link_sample(people: usize) -> GraphData {
	let mut anums = Vec::with_capacity(people);
	let mut anum = FIRST_ANUM;
	for i in 0..people {
		anum += 100 + (rand_simple(i * 7) * 2400.0) as i64;
		anums.push(anum);
	}

	let chain_links: Vec<(i64, i64)> = anums
		.windows(2)
		.filter(|pair| pair[1] - pair[0] < SEQUENTIAL_GAP)
		.map(|pair| (pair[0], pair[1]))
		.collect();
	let chained: BTreeSet<i64> = chain_links.iter().flat_map(|&(a, b)| [a, b]).collect();
	let targets: BTreeSet<i64> = chain_links.iter().map(|&(_, b)| b).collect();

	let mut nodes = vec![GraphNode::new(HUB, "location")];
	nodes.extend(chained.iter().map(|&anum| GraphNode::new(anum, "person")));

	let mut links: Vec<GraphLink> = chain_links
		.iter()
		.map(|&(from, to)| GraphLink::new(from, to))
		.collect();
	links.extend(
		chained
			.difference(&targets)
			.map(|&start| GraphLink::new(HUB, start)),
	);

	GraphData { nodes, links }
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// The report page
#[component]
pub fn Home() -> impl IntoView {
	let sequential = Signal::derive(sequential_sample);
	let branch = Signal::derive(move || branch_and_link_sample(120));

	view! {
		<main class="report">
			<h1>"Sequential Alien Numbers in the mid 1940s"</h1>

			<h2 id="a_numbers">"A Numbers"</h2>
			<p>
				"Every immigrant to the United States is assigned an Alien Number, a case number
				used to track visa and citizenship applications."
			</p>

			<h2 id="hypothesis">"Hypothesis"</h2>
			<p>
				"Between 1940 and 1945 A numbers were often handed out in sequence as paper forms
				arrived in Washington. People with neighbouring numbers may have applied together,
				so linking close numbers could help fill gaps in sparse public records."
			</p>

			<h2 id="graph_analysis">"Graph Analysis"</h2>
			<p>
				"Below, A numbers are linked to the next greatest number and to their naturalization
				location. Hover a node to see its label; drag it to move it around."
			</p>
			<ForceGraph title="Sequential Sample" data=sequential />

			<p>
				"Only numbers within 1000 of their predecessor are linked, and the location hub
				connects to the start of each chain."
			</p>
			<ForceGraph
				title="Branch & Link Sample"
				data=branch
				height=500.0
				options=RenderOptions::branch_and_link()
			/>
		</main>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::{ForceConfig, NodeId, Simulation};

	#[test]
	fn test_sequential_sample_loads() {
		let data = sequential_sample();
		assert_eq!(data.nodes.len(), 7);
		assert_eq!(data.links.len(), 9);
		assert!(Simulation::new(&data, ForceConfig::default(), (250.0, 125.0)).is_ok());
	}

	#[test]
	fn test_branch_sample_is_consistent() {
		let data = branch_and_link_sample(120);
		assert!(data.nodes.len() > 1);
		assert!(Simulation::new(&data, ForceConfig::axis(), (0.0, 0.0)).is_ok());

		let hub = NodeId::from(HUB);
		for link in &data.links {
			if link.source == hub {
				assert!(!data.links.iter().any(|other| other.target == link.target && other.source != hub));
			} else if let (NodeId::Int(a), NodeId::Int(b)) = (&link.source, &link.target) {
				assert!(b > a && b - a < SEQUENTIAL_GAP);
			}
		}
	}
}
