use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressFinish, ProgressStyle};
use log::info;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rayon::prelude::*;
use trail_route::{
	dijkstra::DijkstraRouter,
	errors::RoutingError,
	loading::TrailNetwork,
	objects::VertexId,
	traits::Router,
};
use std::{path::PathBuf, time::Instant};

/// Routes random vertex pairs in parallel and reports timing.
#[derive(Parser, Debug)]
#[command(name = "trailbench", version)]
struct Args {
	#[arg(long, env = "TRAIL_EDGES")]
	edges: PathBuf,
	#[arg(long, env = "TRAIL_VERTICES")]
	vertices: PathBuf,
	/// Number of random (source, target) pairs
	#[arg(long, default_value_t = 1000)]
	pairs: u64,
	#[arg(long, default_value_t = 42)]
	seed: u64,
}

#[derive(Debug, Default, PartialEq)]
struct Summary {
	routed: usize,
	no_route: usize,
	failed: usize,
	mean_hops: f64,
	/// mean total weight of the routed paths
	mean_cost: f64,
}

fn random_pairs(vids: &[VertexId], n: u64, seed: u64) -> Vec<(VertexId, VertexId)> {
	let mut rng = StdRng::seed_from_u64(seed);
	(0..n).filter_map(|_| Some((*vids.choose(&mut rng)?, *vids.choose(&mut rng)?))).collect()
}

fn route_pairs<R: Router + Sync>(router: &R, pairs: &[(VertexId, VertexId)], pbr: &ProgressBar) -> Summary {
	let results: Vec<Result<(usize, f64), RoutingError>> = pairs.par_iter().map(|(s, t)| {
		pbr.inc(1);
		let path = router.shortest_path(s, t)?;
		Ok((path.edges.len(), path.cost.0))
	}).collect();
	let found: Vec<(usize, f64)> = results.iter().filter_map(|r| r.as_ref().ok().copied()).collect();
	// a path with no edges between distinct ids means no route
	let no_route = pairs.iter().zip(results.iter()).filter(|((s, t), r)| s != t && matches!(r, Ok((0, _)))).count();
	let routed: Vec<(usize, f64)> = found.iter().copied().filter(|(h, _)| *h > 0).collect();
	let mean = |total: f64| if routed.is_empty() { 0.0 } else { total / routed.len() as f64 };
	Summary {
		routed: routed.len(),
		no_route,
		failed: results.len() - found.len(),
		mean_hops: mean(routed.iter().map(|(h, _)| *h as f64).sum()),
		mean_cost: mean(routed.iter().map(|(_, c)| *c).sum()),
	}
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let t0 = Instant::now();
	let (graph, _) = TrailNetwork::from_paths(&args.edges, &args.vertices)?.build();
	info!("graph: {} vertice, {} edges, built in {:.3} s", graph.num_vertice(), graph.num_edges(), t0.elapsed().as_secs_f32());

	let mut vids: Vec<VertexId> = graph.vertice.keys().copied().collect();
	vids.sort();
	let pairs = random_pairs(&vids, args.pairs, args.seed);

	let pbr = ProgressBar::new(pairs.len() as u64)
		.with_style(ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")?
			.progress_chars("#>-"))
		.with_finish(ProgressFinish::Abandon);

	let t1 = Instant::now();
	let router = DijkstraRouter { graph: &graph };
	let summary = route_pairs(&router, &pairs, &pbr);
	let secs = t1.elapsed().as_secs_f64();

	info!("routed: {}, no route: {}, failed: {}, mean hops: {:.2}, mean length: {:.1}",
		summary.routed, summary.no_route, summary.failed, summary.mean_hops, summary.mean_cost);
	info!("routing: {:.3} s, {:.6} s per query", secs, secs / pairs.len().max(1) as f64);
	Ok(())
}
