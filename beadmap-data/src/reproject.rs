//! Conversion of source coordinates into WGS84 longitude/latitude.
//!
//! Only two references appear in the bundles: plain WGS84 and spherical Web
//! Mercator. Anything else is rejected rather than guessed.

use std::f64::consts::{FRAC_PI_2, PI};

use geo::{Coord, MapCoords};

/// Coordinate references the loader accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCrs {
    /// EPSG:4326 / OGC CRS84, already in the working frame.
    Wgs84,
    /// EPSG:3857 (also published as EPSG:900913).
    WebMercator,
}

/// Sphere radius used by Web Mercator, in metres.
pub const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

impl SourceCrs {
    /// Recognise a GeoJSON `crs` name such as `urn:ogc:def:crs:EPSG::3857`.
    ///
    /// # Examples
    /// ```
    /// use beadmap_data::SourceCrs;
    ///
    /// assert_eq!(SourceCrs::from_name("urn:ogc:def:crs:OGC:1.3:CRS84"), Some(SourceCrs::Wgs84));
    /// assert_eq!(SourceCrs::from_name("EPSG:900913"), Some(SourceCrs::WebMercator));
    /// assert_eq!(SourceCrs::from_name("EPSG:27700"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        let code = upper
            .rsplit(|c: char| c == ':' || c == '/')
            .find(|part| !part.is_empty())
            .unwrap_or(upper.as_str());
        match code {
            "4326" | "CRS84" => Some(Self::Wgs84),
            "3857" | "900913" | "3785" | "102100" => Some(Self::WebMercator),
            _ => None,
        }
    }

    /// Convert one coordinate into WGS84.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "inverse spherical Mercator is closed-form float maths"
    )]
    pub fn to_wgs84(self, coord: Coord<f64>) -> Coord<f64> {
        match self {
            Self::Wgs84 => coord,
            Self::WebMercator => Coord {
                x: (coord.x / WEB_MERCATOR_RADIUS).to_degrees(),
                y: (2.0 * (coord.y / WEB_MERCATOR_RADIUS).exp().atan() - FRAC_PI_2).to_degrees(),
            },
        }
    }

    /// Convert every coordinate of `geometry` into WGS84.
    #[must_use]
    pub fn reproject<G>(self, geometry: &G) -> G
    where
        G: MapCoords<f64, f64, Output = G> + Clone,
    {
        match self {
            Self::Wgs84 => geometry.clone(),
            Self::WebMercator => geometry.map_coords(|coord| self.to_wgs84(coord)),
        }
    }
}

/// Half the Web Mercator world width in metres.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the extent is the sphere radius times pi"
)]
pub const fn web_mercator_extent() -> f64 {
    WEB_MERCATOR_RADIUS * PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Point, point};
    use rstest::rstest;

    #[expect(
        clippy::float_arithmetic,
        reason = "coordinates are compared within a tolerance"
    )]
    fn close(a: Coord<f64>, b: Coord<f64>) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    #[rstest]
    #[case(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.0 })]
    #[case(Coord { x: web_mercator_extent(), y: 0.0 }, Coord { x: 180.0, y: 0.0 })]
    #[case(
        Coord { x: -8_399_723.497_297_25, y: 4_721_671.572_580_107 },
        Coord { x: -75.456, y: 39.0 }
    )]
    fn inverts_web_mercator(#[case] input: Coord<f64>, #[case] expected: Coord<f64>) {
        let actual = SourceCrs::WebMercator.to_wgs84(input);
        assert!(close(actual, expected), "{actual:?} != {expected:?}");
    }

    #[rstest]
    fn wgs84_is_identity() {
        let p: Point<f64> = point!(x: -75.5, y: 39.1);
        assert_eq!(SourceCrs::Wgs84.reproject(&p), p);
    }

    #[rstest]
    #[case("EPSG:4326", Some(SourceCrs::Wgs84))]
    #[case("urn:ogc:def:crs:EPSG::3857", Some(SourceCrs::WebMercator))]
    #[case("http://www.opengis.net/def/crs/EPSG/0/3857", Some(SourceCrs::WebMercator))]
    #[case("EPSG:2263", None)]
    fn recognises_crs_names(#[case] name: &str, #[case] expected: Option<SourceCrs>) {
        assert_eq!(SourceCrs::from_name(name), expected);
    }
}
