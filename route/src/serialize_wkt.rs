//! serde adapter writing a geodetic line as a WKT `LINESTRING(lon lat, ...)`.

use serde::{self, Deserialize, Serializer, Deserializer};
use geo::LineString;
use wkt::{ToWkt, TryFromWkt};
use crate::objects::LatLon;

pub fn serialize<S>(
	line: &[LatLon],
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	// WKT axis order is x = lon, y = lat
	let ls: LineString = line.iter().map(|p| (p.lon(), p.lat())).collect();
	serializer.serialize_str(&ls.to_wkt().to_string())
}

pub fn deserialize<'de, D>(
	deserializer: D,
) -> Result<Vec<LatLon>, D::Error>
where
	D: Deserializer<'de>,
{
	let s = String::deserialize(deserializer)?;
	let ls = LineString::<f64>::try_from_wkt_str(&s).map_err(serde::de::Error::custom)?;
	Ok(ls.coords().map(|c| LatLon(c.y, c.x)).collect())
}
