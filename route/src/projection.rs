//! Projected planar coordinates <-> geodetic latitude/longitude.
//!
//! The trail data is stored in Korea 2000 / Unified CS (ESRI:102080), a transverse
//! Mercator on the GRS80 ellipsoid. [`TransverseMercator`] evaluates it with the
//! 6th order Krüger series, which is accurate to well under a millimetre across
//! the whole peninsula. With the `proj` feature, [`ProjProjection`] runs the same
//! definition through PROJ instead.

use crate::{errors::RoutingError, objects::LatLon};
use geo::Coord;

/// proj-string of the projection the trail data is stored in.
pub const KOREA_UNIFIED_PROJ: &str = "+proj=tmerc +lat_0=38 +lon_0=127.5 +k=0.9996 +x_0=1000000 +y_0=2000000 +ellps=GRS80 +units=m +no_defs";

pub trait Projection {
	/// Projected `(x, y)` to `(lat, lon)` in degrees.
	fn to_geodetic(&self, c: Coord) -> Result<LatLon, RoutingError>;
	/// Inverse of [`Projection::to_geodetic`].
	fn to_projected(&self, p: LatLon) -> Result<Coord, RoutingError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransverseMercator {
	pub semi_major: f64,
	pub flattening: f64,
	pub lat_0: f64,
	pub lon_0: f64,
	pub scale: f64,
	pub false_easting: f64,
	pub false_northing: f64,
	// derived
	e: f64,
	a_rect: f64,
	alpha: [f64; 6],
	beta: [f64; 6],
	xi_0: f64,
}

const GRS80_A: f64 = 6_378_137.0;
const GRS80_F: f64 = 1.0 / 298.257_222_101;

impl TransverseMercator {
	pub fn new(semi_major: f64, flattening: f64, lat_0: f64, lon_0: f64, scale: f64, false_easting: f64, false_northing: f64) -> Self {
		let n = flattening / (2.0 - flattening);
		let (n2, n3) = (n * n, n * n * n);
		let (n4, n5, n6) = (n3 * n, n3 * n2, n3 * n3);

		let a_rect = semi_major / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);
		let alpha = [
			n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0 - 127.0 * n5 / 288.0 + 7891.0 * n6 / 37800.0,
			13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0 + 281.0 * n5 / 630.0 - 1983433.0 * n6 / 1935360.0,
			61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0 + 167603.0 * n6 / 181440.0,
			49561.0 * n4 / 161280.0 - 179.0 * n5 / 168.0 + 6601661.0 * n6 / 7257600.0,
			34729.0 * n5 / 80640.0 - 3418889.0 * n6 / 1995840.0,
			212378941.0 * n6 / 319334400.0,
		];
		let beta = [
			n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0 - 81.0 * n5 / 512.0 + 96199.0 * n6 / 604800.0,
			n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0 - 1118711.0 * n6 / 3870720.0,
			17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0 + 5569.0 * n6 / 90720.0,
			4397.0 * n4 / 161280.0 - 11.0 * n5 / 504.0 - 830251.0 * n6 / 7257600.0,
			4583.0 * n5 / 161280.0 - 108847.0 * n6 / 3991680.0,
			20648693.0 * n6 / 638668800.0,
		];

		let mut tm = Self {
			semi_major, flattening, lat_0, lon_0, scale, false_easting, false_northing,
			e: (flattening * (2.0 - flattening)).sqrt(),
			a_rect, alpha, beta, xi_0: 0.0,
		};
		tm.xi_0 = tm.xi_eta(lat_0, 0.0).0;
		tm
	}

	/// Korea 2000 / Unified CS (ESRI:102080).
	pub fn korea_unified() -> Self {
		Self::new(GRS80_A, GRS80_F, 38.0, 127.5, 0.9996, 1_000_000.0, 2_000_000.0)
	}

	// tan of conformal latitude from tan of geodetic latitude
	fn taupf(&self, tau: f64) -> f64 {
		let tau1 = 1f64.hypot(tau);
		let sig = (self.e * (self.e * tau / tau1).atanh()).sinh();
		1f64.hypot(sig) * tau - sig * tau1
	}

	// Newton inversion of taupf
	fn tauf(&self, taup: f64) -> f64 {
		let e2m = 1.0 - self.e * self.e;
		let mut tau = taup / e2m;
		for _ in 0..8 {
			let taupa = self.taupf(tau);
			let dtau = (taup - taupa) * (1.0 + e2m * tau * tau) / (e2m * 1f64.hypot(tau) * 1f64.hypot(taupa));
			tau += dtau;
			if dtau.abs() < 1e-14 * tau.abs().max(1.0) {
				break;
			}
		}
		tau
	}

	fn xi_eta(&self, lat: f64, dlon: f64) -> (f64, f64) {
		let taup = self.taupf(lat.to_radians().tan());
		let lam = dlon.to_radians();
		let xip = taup.atan2(lam.cos());
		let etap = (lam.sin() / taup.hypot(lam.cos())).asinh();

		let (mut xi, mut eta) = (xip, etap);
		for (j, a) in self.alpha.iter().enumerate() {
			let k = 2.0 * (j + 1) as f64;
			xi += a * (k * xip).sin() * (k * etap).cosh();
			eta += a * (k * xip).cos() * (k * etap).sinh();
		}
		(xi, eta)
	}

	pub fn forward(&self, p: LatLon) -> Coord {
		let (xi, eta) = self.xi_eta(p.lat(), p.lon() - self.lon_0);
		let k = self.scale * self.a_rect;
		Coord { x: self.false_easting + k * eta, y: self.false_northing + k * (xi - self.xi_0) }
	}

	pub fn inverse(&self, c: Coord) -> LatLon {
		let k = self.scale * self.a_rect;
		let xi = (c.y - self.false_northing) / k + self.xi_0;
		let eta = (c.x - self.false_easting) / k;

		let (mut xip, mut etap) = (xi, eta);
		for (j, b) in self.beta.iter().enumerate() {
			let k = 2.0 * (j + 1) as f64;
			xip -= b * (k * xi).sin() * (k * eta).cosh();
			etap -= b * (k * xi).cos() * (k * eta).sinh();
		}

		let taup = xip.sin() / etap.sinh().hypot(xip.cos());
		let lam = etap.sinh().atan2(xip.cos());
		LatLon(self.tauf(taup).atan().to_degrees(), self.lon_0 + lam.to_degrees())
	}
}

impl Default for TransverseMercator {
	fn default() -> Self { Self::korea_unified() }
}

impl Projection for TransverseMercator {
	fn to_geodetic(&self, c: Coord) -> Result<LatLon, RoutingError> { Ok(self.inverse(c)) }
	fn to_projected(&self, p: LatLon) -> Result<Coord, RoutingError> { Ok(self.forward(p)) }
}

#[cfg(feature = "proj")]
pub use proj_backend::ProjProjection;

#[cfg(feature = "proj")]
mod proj_backend {
	use super::*;
	use proj::Proj;

	/// PROJ-backed projection. Holds both directions to avoid querying the proj db per point.
	pub struct ProjProjection {
		inverse: Proj,
		forward: Proj,
	}

	impl ProjProjection {
		pub fn new(definition: &str) -> Result<Self, RoutingError> {
			let inverse = Proj::new_known_crs(definition, "EPSG:4326", None).map_err(projection_error)?;
			let forward = Proj::new_known_crs("EPSG:4326", definition, None).map_err(projection_error)?;
			Ok(Self { inverse, forward })
		}

		pub fn korea_unified() -> Result<Self, RoutingError> { Self::new(KOREA_UNIFIED_PROJ) }
	}

	fn projection_error<E: std::fmt::Display>(e: E) -> RoutingError {
		RoutingError::Projection { msg: e.to_string() }
	}

	impl Projection for ProjProjection {
		fn to_geodetic(&self, c: Coord) -> Result<LatLon, RoutingError> {
			// EPSG:4326 comes back in visualization order (lon, lat)
			let (lon, lat) = self.inverse.convert((c.x, c.y)).map_err(projection_error)?;
			Ok(LatLon(lat, lon))
		}

		fn to_projected(&self, p: LatLon) -> Result<Coord, RoutingError> {
			let (x, y) = self.forward.convert((p.lon(), p.lat())).map_err(projection_error)?;
			Ok(Coord { x, y })
		}
	}
}
