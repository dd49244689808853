use crate::{
	errors::{ok_or_unknown, RoutingError},
	graph::{EdgeTable, Graph},
	objects::{Cost, EdgeId, LatLon, PathResult, VertexId},
	projection::Projection,
	transform::GeodeticConverter,
};
use geo::{EuclideanDistance, LineString, Point};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Waypoint {
	pub id: VertexId,
	/// 1-based position along the route
	pub order: usize,
	pub position: LatLon,
	pub is_first: bool,
	pub is_last: bool,
}

/// Renderer-ready route. `lines[i]` is the geometry of `edges[i]`, read in travel direction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
	pub vertices: Vec<VertexId>,
	pub edges: Vec<EdgeId>,
	pub lines: Vec<Vec<LatLon>>,
	pub difficulty: Vec<Option<i64>>,
	pub waypoints: Vec<Waypoint>,
	pub cost: Cost,
}

impl Route {
	pub fn empty() -> Self {
		Self { vertices: vec![], edges: vec![], lines: vec![], difficulty: vec![], waypoints: vec![], cost: Cost::INFINITY }
	}

	pub fn is_empty(&self) -> bool { self.vertices.is_empty() }
}

/// `true` when the stored point order runs from `to` towards `from`.
fn runs_backwards(geom: &LineString, from: &Point, to: &Point) -> bool {
	let (first, last) = match (geom.points().next(), geom.points().last()) {
		(Some(f), Some(l)) => (f, l),
		_ => return false,
	};
	let as_stored = first.euclidean_distance(from) + last.euclidean_distance(to);
	let reversed = first.euclidean_distance(to) + last.euclidean_distance(from);
	reversed < as_stored
}

/// Materializes a path into geodetic lines and waypoints. An empty path gives an empty route.
pub fn assemble_route<P: Projection>(
	path: &PathResult,
	graph: &Graph,
	table: &EdgeTable,
	converter: &mut GeodeticConverter<P>,
) -> Result<Route, RoutingError> {
	if path.is_empty() {
		return Ok(Route::empty());
	}
	if path.vertices.len() != path.edges.len() + 1 {
		return Err(RoutingError::BrokenPath {
			msg: format!("{} vertice with {} edges", path.vertices.len(), path.edges.len()),
		});
	}

	let mut positions = Vec::with_capacity(path.vertices.len());
	for vid in path.vertices.iter() {
		positions.push(ok_or_unknown(graph.get(vid), *vid)?.geom);
	}

	let mut lines = Vec::with_capacity(path.edges.len());
	let mut difficulty = Vec::with_capacity(path.edges.len());
	for (i, eid) in path.edges.iter().enumerate() {
		let edge = table.get(eid).ok_or(RoutingError::MissingEdge { eid: *eid })?;
		let mut line = converter.convert_line(&edge.geom)?;
		if runs_backwards(&edge.geom, &positions[i], &positions[i + 1]) {
			line.reverse();
		}
		lines.push(line);
		difficulty.push(edge.difficulty);
	}

	let last = path.vertices.len() - 1;
	let mut waypoints = Vec::with_capacity(path.vertices.len());
	for (i, (vid, pos)) in path.vertices.iter().zip(positions.iter()).enumerate() {
		waypoints.push(Waypoint {
			id: *vid,
			order: i + 1,
			position: converter.convert(pos.0)?,
			is_first: i == 0,
			is_last: i == last,
		});
	}

	Ok(Route { vertices: path.vertices.clone(), edges: path.edges.clone(), lines, difficulty, waypoints, cost: path.cost })
}
