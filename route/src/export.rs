use crate::{
	errors::ExportError,
	objects::{Cost, EdgeId, LatLon, VertexId},
	route::{Route, Waypoint},
	serialize_wkt,
};
use serde::{Deserialize, Serialize};
use std::{fs, io::Write, path::{Path, PathBuf}};

#[derive(Serialize, Debug)]
pub struct RouteMeta {
	pub start: VertexId,
	pub end: VertexId,
	pub cost: Cost,
	pub created: String,
}

/// JSON document handed to the map renderer.
#[derive(Serialize, Debug)]
pub struct RouteDocument<'a> {
	pub meta: RouteMeta,
	pub vertices: &'a [VertexId],
	pub edges: &'a [EdgeId],
	pub lines: &'a [Vec<LatLon>],
	pub difficulty: &'a [Option<i64>],
	pub waypoints: &'a [Waypoint],
}

impl<'a> RouteDocument<'a> {
	pub fn new(route: &'a Route, start: VertexId, end: VertexId, created: String) -> Self {
		Self {
			meta: RouteMeta { start, end, cost: route.cost, created },
			vertices: &route.vertices,
			edges: &route.edges,
			lines: &route.lines,
			difficulty: &route.difficulty,
			waypoints: &route.waypoints,
		}
	}
}

pub fn route_file_name(start: VertexId, end: VertexId) -> String {
	format!("path_{}_{}.json", start, end)
}

/// Writes `path_{start}_{end}.json` into `dir`, creating it when missing.
pub fn write_route_json(doc: &RouteDocument, dir: &Path) -> Result<PathBuf, ExportError> {
	fs::create_dir_all(dir)?;
	let out = dir.join(route_file_name(doc.meta.start, doc.meta.end));
	let mut f = fs::File::create(&out)?;
	serde_json::to_writer_pretty(&mut f, doc)?;
	f.write_all(b"\n")?;
	Ok(out)
}

#[allow(non_snake_case)]
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct RouteRow {
	pub seq: usize,
	pub edge: EdgeId,
	pub from: VertexId,
	pub to: VertexId,
	pub difficulty: Option<i64>,
	#[serde(with = "serialize_wkt")]
	pub WKT: Vec<LatLon>,
}

pub fn route_rows(route: &Route) -> Vec<RouteRow> {
	route.edges.iter().enumerate().map(|(i, eid)| RouteRow {
		seq: i + 1,
		edge: *eid,
		from: route.vertices[i],
		to: route.vertices[i + 1],
		difficulty: route.difficulty[i],
		WKT: route.lines[i].clone(),
	}).collect()
}

/// One CSV row per traversed edge, geometry as WKT in lon/lat degrees.
pub fn write_route_csv<W: Write>(route: &Route, wr: W) -> Result<(), ExportError> {
	let mut cw = csv::Writer::from_writer(wr);
	for row in route_rows(route) {
		cw.serialize(row)?;
	}
	cw.flush()?;
	Ok(())
}

#[cfg(test)]
mod export_tests {
	use super::*;
	use crate::{
		dijkstra::shortest_path,
		graph::{build_graph, fixtures::four_vertex},
		route::assemble_route,
		transform::GeodeticConverter,
	};

	fn sample_route() -> Route {
		let (edges, vertices) = four_vertex();
		let (g, table) = build_graph(&edges, &vertices);
		let path = shortest_path(&g, VertexId(1), VertexId(4)).unwrap();
		assemble_route(&path, &g, &table, &mut GeodeticConverter::korea_unified()).unwrap()
	}

	#[test]
	fn json_document_layout() {
		let route = sample_route();
		let doc = RouteDocument::new(&route, VertexId(1), VertexId(4), "2024-01-01T00:00:00Z".into());
		let v: serde_json::Value = serde_json::to_value(&doc).unwrap();
		assert_eq!(v["vertices"], serde_json::json!([1, 3, 4]));
		assert_eq!(v["edges"], serde_json::json!([13, 34]));
		assert_eq!(v["meta"]["start"], 1);
		assert_eq!(v["meta"]["cost"], 4.0);
		let first_point = &v["lines"][0][0];
		assert!(first_point.is_array());
		assert_eq!(first_point.as_array().unwrap().len(), 2);
		assert_eq!(v["waypoints"][2]["order"], 3);
		assert_eq!(v["waypoints"][2]["is_last"], true);
	}

	#[test]
	fn json_file_is_written() {
		let route = sample_route();
		let dir = tempfile::tempdir().unwrap();
		let target = dir.path().join("route");
		let doc = RouteDocument::new(&route, VertexId(1), VertexId(4), "now".into());
		let out = write_route_json(&doc, &target).unwrap();
		assert_eq!(out.file_name().unwrap(), "path_1_4.json");
		let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
		assert_eq!(v["lines"].as_array().unwrap().len(), 2);
	}

	#[test]
	fn csv_rows_carry_wkt() {
		let route = sample_route();
		let mut buf = vec![];
		write_route_csv(&route, &mut buf).unwrap();
		let text = String::from_utf8(buf).unwrap();
		let mut lines = text.lines();
		assert_eq!(lines.next(), Some("seq,edge,from,to,difficulty,WKT"));
		let row = lines.next().unwrap();
		assert!(row.starts_with("1,13,1,3,,"), "{}", row);
		assert!(row.contains("LINESTRING"), "{}", row);

		let mut rd = csv::Reader::from_reader(text.as_bytes());
		let rows: Vec<RouteRow> = rd.deserialize().collect::<Result<_, _>>().unwrap();
		assert_eq!(rows.len(), 2);
		assert_eq!(rows[1].edge, EdgeId(34));
		let p = rows[1].WKT[0];
		let q = route.lines[1][0];
		assert!((p.lat() - q.lat()).abs() < 1e-9 && (p.lon() - q.lon()).abs() < 1e-9);
	}
}
