use crate::{
	errors::RoutingError,
	objects::{Coordinates, LatLon},
	projection::{Projection, TransverseMercator},
};
use geo::{Coord, LineString};
use std::collections::HashMap;

/// Converts projected coordinates to geodetic ones, memoizing every distinct input pair.
/// The key is the exact bit pattern of `(x, y)`, so the cache can only return
/// what the projection returned for that very input.
pub struct GeodeticConverter<P: Projection = TransverseMercator> {
	projection: P,
	cache: HashMap<(u64, u64), LatLon>,
	hits: usize,
}

impl GeodeticConverter<TransverseMercator> {
	pub fn korea_unified() -> Self { Self::new(TransverseMercator::korea_unified()) }
}

impl<P: Projection> GeodeticConverter<P> {
	pub fn new(projection: P) -> Self {
		Self { projection, cache: HashMap::new(), hits: 0 }
	}

	pub fn projection(&self) -> &P { &self.projection }

	pub fn convert(&mut self, c: Coord) -> Result<LatLon, RoutingError> {
		let key = (c.x.to_bits(), c.y.to_bits());
		if let Some(p) = self.cache.get(&key) {
			self.hits += 1;
			return Ok(*p);
		}
		let p = self.projection.to_geodetic(c)?;
		self.cache.insert(key, p);
		Ok(p)
	}

	pub fn convert_line(&mut self, ls: &LineString) -> Result<Vec<LatLon>, RoutingError> {
		ls.coords().map(|c| self.convert(*c)).collect()
	}

	/// Same nesting as the input, every `[x, y]` leaf replaced by `[lat, lon]`.
	pub fn convert_nested(&mut self, coords: &Coordinates) -> Result<Coordinates, RoutingError> {
		Ok(match coords {
			Coordinates::Point([x, y]) => {
				let p = self.convert(Coord { x: *x, y: *y })?;
				Coordinates::Point([p.lat(), p.lon()])
			},
			Coordinates::PointZ([x, y, z]) => {
				let p = self.convert(Coord { x: *x, y: *y })?;
				Coordinates::PointZ([p.lat(), p.lon(), *z])
			},
			Coordinates::Nested(items) => Coordinates::Nested(
				items.iter().map(|c| self.convert_nested(c)).collect::<Result<_, _>>()?
			),
		})
	}

	/// Number of distinct points converted so far.
	pub fn len(&self) -> usize { self.cache.len() }
	pub fn is_empty(&self) -> bool { self.cache.is_empty() }
	pub fn hits(&self) -> usize { self.hits }
}

impl Default for GeodeticConverter<TransverseMercator> {
	fn default() -> Self { Self::korea_unified() }
}
