use serde::{Serialize, Deserialize};
use geo::{Coord, LineString};
use std::{
	cmp::Ordering, ops::Add, fmt,
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub i64);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub i64);

impl fmt::Display for VertexId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Edge length used as the graph weight. Always finite and positive once built.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(pub f64);

impl Weight {
	/// Declared length, or unit weight when it is missing, non-finite or not positive.
	pub fn from_length(length: Option<f64>) -> Self {
		match length {
			Some(l) if l.is_finite() && l > 0.0 => Weight(l),
			_ => Weight(1.0),
		}
	}
}

/// Accumulated path cost. Totally ordered so it can key the priority queue.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cost(pub f64);

impl Cost {
	pub const ZERO: Cost = Cost(0.0);
	pub const INFINITY: Cost = Cost(f64::INFINITY);
}

impl PartialEq for Cost {
	fn eq(&self, other: &Cost) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
	fn partial_cmp(&self, other: &Cost) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Cost {
	fn cmp(&self, other: &Cost) -> Ordering { self.0.total_cmp(&other.0) }
}

impl Add<Cost> for Cost {
	type Output = Cost;
	fn add(self, other: Cost) -> Cost { Cost(self.0 + other.0) }
}

impl Add<Weight> for Cost {
	type Output = Cost;
	fn add(self, other: Weight) -> Cost { Cost(self.0 + other.0) }
}

/// Arbitrarily nested `[x, y]` arrays, as trail geometries are stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinates {
	Point([f64; 2]),
	/// `[x, y, z]`, the elevation is carried along but never routed on
	PointZ([f64; 3]),
	Nested(Vec<Coordinates>),
}

impl Coordinates {
	/// Leaf points in storage order.
	pub fn points(&self) -> Vec<Coord> {
		let mut res = vec![];
		self.collect_points(&mut res);
		res
	}

	fn collect_points(&self, res: &mut Vec<Coord>) {
		match self {
			Self::Point([x, y]) | Self::PointZ([x, y, _]) => res.push(Coord { x: *x, y: *y }),
			Self::Nested(items) => items.iter().for_each(|c| c.collect_points(res)),
		}
	}

	/// Flattened line, `None` when fewer than two points are stored.
	pub fn line_string(&self) -> Option<LineString> {
		let pts = self.points();
		(pts.len() >= 2).then(|| LineString::from(pts))
	}
}

impl From<&LineString> for Coordinates {
	fn from(ls: &LineString) -> Self {
		Self::Nested(ls.coords().map(|c| Self::Point([c.x, c.y])).collect())
	}
}

/// Trail segment record as delivered by the data loader.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RawEdge {
	pub id: EdgeId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub length: Option<f64>,
	#[serde(default)]
	pub coordinates: Option<Coordinates>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub difficulty: Option<i64>,
}

/// Junction record as delivered by the data loader.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RawVertex {
	pub id: VertexId,
	pub coordinates: [f64; 2],
	#[serde(default)]
	pub connected_edges: Vec<EdgeId>,
}

/// Geodetic position, serialized as `[lat, lon]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
	pub fn lat(&self) -> f64 { self.0 }
	pub fn lon(&self) -> f64 { self.1 }
}

/// Vertex and edge sequence found by a router. Empty means no route.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathResult {
	pub vertices: Vec<VertexId>,
	pub edges: Vec<EdgeId>,
	pub cost: Cost,
}

impl PathResult {
	pub fn empty() -> Self { Self { vertices: vec![], edges: vec![], cost: Cost::INFINITY } }
	pub fn is_empty(&self) -> bool { self.vertices.is_empty() }
}
