use geo::{Coord, EuclideanLength, LineString};
use geojson::{FeatureCollection, GeoJson, JsonObject, Value};
use log::{info, warn};
use serde_json::json;
use thiserror::Error;
use trail_route::objects::{Coordinates, EdgeId, RawEdge, RawVertex, VertexId};

use std::{
	collections::{BTreeMap, HashMap},
	fs,
	path::{Path, PathBuf},
};

#[derive(Debug, Error)]
pub enum PrepError {
	#[error("cannot read or write {path}: {source}")]
	Io { path: PathBuf, source: std::io::Error },
	#[error(transparent)]
	GeoJson(#[from] geojson::Error),
	#[error(transparent)]
	Json(#[from] serde_json::Error),
	#[error("{path} is not a FeatureCollection")]
	NotAFeatureCollection { path: PathBuf },
}

pub fn read_collection(path: &Path) -> Result<FeatureCollection, PrepError> {
	let text = fs::read_to_string(path).map_err(|source| PrepError::Io { path: path.to_path_buf(), source })?;
	match text.parse::<GeoJson>()? {
		GeoJson::FeatureCollection(fc) => Ok(fc),
		_ => Err(PrepError::NotAFeatureCollection { path: path.to_path_buf() }),
	}
}

fn write_text(path: &Path, text: &str) -> Result<(), PrepError> {
	fs::write(path, text).map_err(|source| PrepError::Io { path: path.to_path_buf(), source })
}

// ---------------------------------------------------------------------------
// splitting a collection by property value

fn group_name(props: Option<&JsonObject>, property: &str) -> String {
	match props.and_then(|p| p.get(property)) {
		Some(serde_json::Value::String(s)) => s.clone(),
		Some(serde_json::Value::Null) | None => "unknown".into(),
		Some(other) => other.to_string(),
	}
}

/// Groups features by the value of `property`, one collection per value.
/// Every group carries `name` = value and the input's `crs` member.
pub fn split_by_property(fc: FeatureCollection, property: &str) -> BTreeMap<String, FeatureCollection> {
	let crs = fc.foreign_members.as_ref().and_then(|m| m.get("crs")).cloned().unwrap_or_else(|| json!({}));
	let mut groups: BTreeMap<String, Vec<geojson::Feature>> = BTreeMap::new();
	for f in fc.features.into_iter() {
		groups.entry(group_name(f.properties.as_ref(), property)).or_default().push(f);
	}
	groups.into_iter().map(|(name, features)| {
		let mut members = JsonObject::new();
		members.insert("name".into(), json!(name));
		members.insert("crs".into(), crs.clone());
		(name, FeatureCollection { bbox: None, features, foreign_members: Some(members) })
	}).collect()
}

/// Group names become file names, so path separators are replaced.
pub fn group_file_name(name: &str) -> String {
	let safe: String = name.chars().map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c }).collect();
	format!("{}.geojson", safe)
}

pub fn write_groups(groups: &BTreeMap<String, FeatureCollection>, out_dir: &Path) -> Result<Vec<PathBuf>, PrepError> {
	fs::create_dir_all(out_dir).map_err(|source| PrepError::Io { path: out_dir.to_path_buf(), source })?;
	let mut written = vec![];
	for (name, fc) in groups.iter() {
		let path = out_dir.join(group_file_name(name));
		write_text(&path, &serde_json::to_string_pretty(fc)?)?;
		info!("saved {} ({} features)", path.display(), fc.features.len());
		written.push(path);
	}
	Ok(written)
}

// ---------------------------------------------------------------------------
// extracting the routable network

#[derive(Clone, Debug)]
pub struct ExtractOptions {
	pub length_property: String,
	pub difficulty_property: String,
}

impl Default for ExtractOptions {
	fn default() -> Self {
		Self { length_property: "length".into(), difficulty_property: "difficulty".into() }
	}
}

#[derive(Clone, Debug, Default)]
pub struct Network {
	pub edges: Vec<RawEdge>,
	pub vertices: Vec<RawVertex>,
}

struct Part {
	coords: Vec<Coord>,
	length: Option<f64>,
	difficulty: Option<i64>,
}

type PointKey = (u64, u64);

fn key(c: &Coord) -> PointKey { (c.x.to_bits(), c.y.to_bits()) }

/// Plane coordinates of a position list, z dropped and repeated points collapsed.
fn to_coords(line: &[Vec<f64>]) -> Vec<Coord> {
	let mut coords: Vec<Coord> = line.iter().filter(|p| p.len() >= 2).map(|p| Coord { x: p[0], y: p[1] }).collect();
	coords.dedup_by_key(|c| key(c));
	coords
}

fn int_property(props: Option<&JsonObject>, name: &str) -> Option<i64> {
	match props?.get(name)? {
		serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
		serde_json::Value::String(s) => s.trim().parse().ok(),
		_ => None,
	}
}

fn float_property(props: Option<&JsonObject>, name: &str) -> Option<f64> {
	match props?.get(name)? {
		serde_json::Value::Number(n) => n.as_f64(),
		serde_json::Value::String(s) => s.trim().parse().ok(),
		_ => None,
	}
}

fn collect_parts(fc: &FeatureCollection, opts: &ExtractOptions) -> Vec<Part> {
	let mut parts = vec![];
	let mut skipped = 0usize;
	for f in fc.features.iter() {
		let props = f.properties.as_ref();
		let lines: Vec<Vec<Coord>> = match f.geometry.as_ref().map(|g| &g.value) {
			Some(Value::LineString(ls)) => vec![to_coords(ls)],
			Some(Value::MultiLineString(mls)) => mls.iter().map(|ls| to_coords(ls)).collect(),
			_ => { skipped += 1; continue; }
		};
		// a declared length describes the whole feature, so it only holds for single-part lines
		let length = if lines.len() == 1 { float_property(props, &opts.length_property) } else { None };
		let difficulty = int_property(props, &opts.difficulty_property);
		for coords in lines.into_iter() {
			if coords.len() < 2 {
				skipped += 1;
				continue;
			}
			parts.push(Part { coords, length, difficulty });
		}
	}
	if skipped > 0 {
		warn!("{} features or parts are not lines with two or more points, skipped", skipped);
	}
	parts
}

/// Builds edge and vertex records from line features.
///
/// Line ends are junctions, and so is every point that occurs more than once
/// across all lines. Lines are cut at junctions; each piece becomes an edge
/// between the junction vertice at its ends.
pub fn extract_network(fc: &FeatureCollection, opts: &ExtractOptions) -> Network {
	let parts = collect_parts(fc, opts);

	let mut occurrences: HashMap<PointKey, usize> = HashMap::new();
	for p in parts.iter() {
		for c in p.coords.iter() {
			*occurrences.entry(key(c)).or_insert(0) += 1;
		}
	}
	let is_junction = |p: &Part, i: usize| {
		i == 0 || i == p.coords.len() - 1 || occurrences.get(&key(&p.coords[i])).copied().unwrap_or(0) > 1
	};

	let mut net = Network::default();
	let mut vids: HashMap<PointKey, usize> = HashMap::new();
	let mut vertex_at = |c: &Coord, vertices: &mut Vec<RawVertex>| -> usize {
		*vids.entry(key(c)).or_insert_with(|| {
			vertices.push(RawVertex { id: VertexId(vertices.len() as i64 + 1), coordinates: [c.x, c.y], connected_edges: vec![] });
			vertices.len() - 1
		})
	};

	for p in parts.iter() {
		let cuts: Vec<usize> = (0..p.coords.len()).filter(|i| is_junction(p, *i)).collect();
		let whole = cuts.len() == 2;
		for w in cuts.windows(2) {
			let piece = &p.coords[w[0]..=w[1]];
			let ls = LineString::from(piece.to_vec());
			let length = match (whole, p.length) {
				(true, Some(l)) => l,
				_ => ls.euclidean_length(),
			};
			let eid = EdgeId(net.edges.len() as i64 + 1);
			let a = vertex_at(&piece[0], &mut net.vertices);
			let b = vertex_at(&piece[piece.len() - 1], &mut net.vertices);
			net.vertices[a].connected_edges.push(eid);
			net.vertices[b].connected_edges.push(eid);
			net.edges.push(RawEdge {
				id: eid,
				length: Some(length),
				coordinates: Some(Coordinates::from(&ls)),
				difficulty: p.difficulty,
			});
		}
	}
	info!("extracted {} edges and {} vertice from {} lines", net.edges.len(), net.vertices.len(), parts.len());
	net
}

pub fn write_network(net: &Network, edges: &Path, vertices: &Path) -> Result<(), PrepError> {
	write_text(edges, &serde_json::to_string(&net.edges)?)?;
	write_text(vertices, &serde_json::to_string(&net.vertices)?)?;
	Ok(())
}
