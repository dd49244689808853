use crate::objects::{VertexId, EdgeId, Weight, RawEdge, RawVertex};
use geo::{LineString, Point};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

/// One directed adjacency entry. Every routable edge yields two of them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Adjacency {
	pub neighbour: VertexId,
	pub edge: EdgeId,
	pub weight: Weight,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
	pub id: VertexId,
	pub geom: Point,
	pub edges: Vec<Adjacency>,
}

/// Routable edge, keyed by id in the [`EdgeTable`].
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub id: EdgeId,
	pub v1: VertexId,
	pub v2: VertexId,
	pub weight: Weight,
	pub geom: LineString,
	pub difficulty: Option<i64>,
}

pub type EdgeTable = HashMap<EdgeId, Edge>;

/// Undirected trail graph. Built once per request, never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	pub vertice: HashMap<VertexId, Vertex>,
}

impl Graph {
	pub fn get(&self, k: &VertexId) -> Option<&Vertex> { self.vertice.get(k) }
	pub fn contains(&self, k: &VertexId) -> bool { self.vertice.contains_key(k) }
	pub fn neighbours(&self, k: &VertexId) -> &[Adjacency] {
		self.vertice.get(k).map(|v| v.edges.as_slice()).unwrap_or(&[])
	}
	pub fn num_vertice(&self) -> usize { self.vertice.len() }
	pub fn num_edges(&self) -> usize { self.vertice.values().map(|v| v.edges.len()).sum::<usize>() / 2 }
}

/// Builds the graph and the edge table from flat records.
///
/// The edge->vertex relation is the inverse of each vertex's `connected_edges`.
/// Edges not referenced by exactly two distinct vertices, missing from the edge
/// collection or with fewer than two points are left out of the graph.
pub fn build_graph(edges: &[RawEdge], vertices: &[RawVertex]) -> (Graph, EdgeTable) {
	let raw_edges: HashMap<EdgeId, &RawEdge> = edges.iter().map(|e| (e.id, e)).collect();
	let mut graph = Graph::default();
	let mut incident: BTreeMap<EdgeId, Vec<VertexId>> = BTreeMap::new();

	for v in vertices.iter() {
		if graph.contains(&v.id) {
			warn!("duplicate vertex {}, keeping the first record", v.id);
			continue;
		}
		let [x, y] = v.coordinates;
		graph.vertice.insert(v.id, Vertex { id: v.id, geom: Point::new(x, y), edges: vec![] });
		for eid in v.connected_edges.iter() {
			incident.entry(*eid).or_default().push(v.id);
		}
	}

	let mut table = EdgeTable::new();
	let (mut dangling, mut unknown, mut shapeless, mut looped) = (0usize, 0usize, 0usize, 0usize);

	for (eid, vids) in incident.into_iter() {
		let (v1, v2) = match vids.as_slice() {
			&[v1, v2] => (v1, v2),
			_ => { dangling += 1; continue; }
		};
		if v1 == v2 {
			looped += 1;
			continue;
		}
		let raw = match raw_edges.get(&eid) {
			Some(e) => *e,
			None => { unknown += 1; continue; }
		};
		let geom = match raw.coordinates.as_ref().and_then(|c| c.line_string()) {
			Some(g) => g,
			None => { shapeless += 1; continue; }
		};

		let weight = Weight::from_length(raw.length);
		for (a, b) in [(v1, v2), (v2, v1)] {
			if let Some(v) = graph.vertice.get_mut(&a) {
				v.edges.push(Adjacency { neighbour: b, edge: eid, weight });
			}
		}
		table.insert(eid, Edge { id: eid, v1, v2, weight, geom, difficulty: raw.difficulty });
	}

	if unknown > 0 { warn!("{} edge ids referenced by vertices are missing from the edge collection", unknown); }
	if shapeless > 0 { warn!("{} edges have fewer than two points", shapeless); }
	if looped > 0 { warn!("{} self-referential edges", looped); }
	debug!("graph: {} vertice, {} edges, {} dropped as not joining exactly two vertice",
		graph.num_vertice(), table.len(), dangling);

	(graph, table)
}

#[cfg(test)]
pub(crate) mod fixtures {
	use crate::objects::{RawEdge, RawVertex, VertexId, EdgeId, Coordinates};

	pub fn vertex(id: i64, x: f64, y: f64, edges: &[i64]) -> RawVertex {
		RawVertex { id: VertexId(id), coordinates: [x, y], connected_edges: edges.iter().map(|e| EdgeId(*e)).collect() }
	}

	pub fn edge(id: i64, length: f64, pts: &[(f64, f64)]) -> RawEdge {
		RawEdge {
			id: EdgeId(id), length: Some(length), difficulty: None,
			coordinates: Some(Coordinates::Nested(pts.iter().map(|(x, y)| Coordinates::Point([*x, *y])).collect())),
		}
	}

	//  1 ---5--- 2
	//  |         |
	//  3         5
	//  |         |
	//  3 ---1--- 4     edges: 12 (1-2), 23 (2-3), 13 (1-3), 34 (3-4)
	//
	// 2-3 is the diagonal; coordinates in metres around the projection origin
	pub fn four_vertex() -> (Vec<RawEdge>, Vec<RawVertex>) {
		let (p1, p2, p3, p4) = ((1_000_000.0, 2_000_100.0), (1_000_100.0, 2_000_100.0), (1_000_000.0, 2_000_000.0), (1_000_100.0, 2_000_000.0));
		let edges = vec![
			edge(12, 5.0, &[p1, p2]),
			edge(23, 5.0, &[p2, p3]),
			edge(13, 3.0, &[p1, p3]),
			// stored running 4 -> 3
			edge(34, 1.0, &[p4, (1_000_050.0, 2_000_000.0), p3]),
		];
		let vertices = vec![
			vertex(1, p1.0, p1.1, &[12, 13]),
			vertex(2, p2.0, p2.1, &[12, 23]),
			vertex(3, p3.0, p3.1, &[23, 13, 34]),
			vertex(4, p4.0, p4.1, &[34]),
		];
		(edges, vertices)
	}

	// two components: 1-2-3 and 10-11
	pub fn disconnected() -> (Vec<RawEdge>, Vec<RawVertex>) {
		let edges = vec![
			edge(1, 2.0, &[(0.0, 0.0), (1.0, 0.0)]),
			edge(2, 2.0, &[(1.0, 0.0), (2.0, 0.0)]),
			edge(3, 2.0, &[(10.0, 0.0), (11.0, 0.0)]),
		];
		let vertices = vec![
			vertex(1, 0.0, 0.0, &[1]),
			vertex(2, 1.0, 0.0, &[1, 2]),
			vertex(3, 2.0, 0.0, &[2]),
			vertex(10, 10.0, 0.0, &[3]),
			vertex(11, 11.0, 0.0, &[3]),
		];
		(edges, vertices)
	}

	//	1---2---4---6---8---10
	//	    |   |   |   |
	//	    3---5   7---9---11
	// lengths vary so that several detours compete
	pub fn ladder() -> (Vec<RawEdge>, Vec<RawVertex>) {
		let links: Vec<(i64, i64, f64)> = vec![
			(1, 2, 2.0), (2, 3, 1.0), (2, 4, 4.0), (3, 5, 1.5),
			(4, 5, 1.0), (4, 6, 3.0), (6, 7, 1.0), (6, 8, 2.5),
			(7, 9, 1.0), (8, 9, 1.0), (8, 10, 2.0), (9, 11, 4.0),
		];
		let pos = |v: i64| (v as f64 * 10.0, (v % 2) as f64 * 10.0);
		let mut edges = vec![];
		let mut vertices: Vec<RawVertex> = (1..=11).map(|v| { let (x, y) = pos(v); vertex(v, x, y, &[]) }).collect();
		for (i, (a, b, len)) in links.into_iter().enumerate() {
			let eid = 100 + i as i64;
			edges.push(edge(eid, len, &[pos(a), pos(b)]));
			vertices[(a - 1) as usize].connected_edges.push(EdgeId(eid));
			vertices[(b - 1) as usize].connected_edges.push(EdgeId(eid));
		}
		(edges, vertices)
	}
}
