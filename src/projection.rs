use crate::types::CountryFeature;
use geo::algorithm::centroid::Centroid;
use std::f64::consts::PI;

/// Web Mercator latitude limit; the poles project to infinity without it.
const MAX_LATITUDE: f64 = 85.05113;

/// A Mercator projection: geographic coordinates are offset from `center`,
/// scaled, and shifted to `translate`. Projections are plain values, so each
/// view constructs its own rather than sharing a mutable one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: f64,
    /// (lon, lat) in degrees.
    pub center: (f64, f64),
    /// Pixel position of the projected center.
    pub translate: (f64, f64),
}

impl Projection {
    /// World view: centered on (0, 0), anchored at the canvas midpoint with
    /// the vertical anchor at `height / 1.5`.
    pub fn world(scale: f64, width: f64, height: f64) -> Self {
        Self {
            scale,
            center: (0.0, 0.0),
            translate: (width / 2.0, height / 1.5),
        }
    }

    /// Single-country view: same scale, centered on the country's centroid.
    pub fn for_country(feature: &CountryFeature, scale: f64, width: f64, height: f64) -> Self {
        let center = feature
            .geometry
            .centroid()
            .map(|c| (c.x(), c.y()))
            .unwrap_or((0.0, 0.0));
        Self {
            scale,
            center,
            translate: (width / 2.0, height / 2.0),
        }
    }

    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = self.translate.0 + self.scale * (lon - self.center.0).to_radians();
        let y = self.translate.1 - self.scale * (mercator_y(lat) - mercator_y(self.center.1));
        (x, y)
    }
}

fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    (PI / 4.0 + lat_rad / 2.0).tan().ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square_country() -> CountryFeature {
        CountryFeature {
            name: "Squareland".to_string(),
            geometry: MultiPolygon::new(vec![polygon![
                (x: 10.0, y: 10.0),
                (x: 20.0, y: 10.0),
                (x: 20.0, y: 20.0),
                (x: 10.0, y: 20.0),
                (x: 10.0, y: 10.0),
            ]]),
        }
    }

    #[test]
    fn center_projects_to_translate() {
        let projection = Projection::world(150.0, 1200.0, 800.0);
        let (x, y) = projection.project(0.0, 0.0);
        assert!((x - 600.0).abs() < 1e-9);
        assert!((y - 800.0 / 1.5).abs() < 1e-9);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let projection = Projection::world(150.0, 1200.0, 800.0);
        let (origin_x, origin_y) = projection.project(0.0, 0.0);
        let (east_x, _) = projection.project(10.0, 0.0);
        let (_, north_y) = projection.project(0.0, 10.0);
        assert!(east_x > origin_x);
        assert!(north_y < origin_y);
    }

    #[test]
    fn polar_latitudes_stay_finite() {
        let projection = Projection::world(150.0, 1200.0, 800.0);
        let (_, y) = projection.project(0.0, 90.0);
        assert!(y.is_finite());
        let (_, y) = projection.project(0.0, -90.0);
        assert!(y.is_finite());
    }

    #[test]
    fn country_projection_centers_the_centroid() {
        let feature = square_country();
        let projection = Projection::for_country(&feature, 150.0, 1200.0, 500.0);
        // Centroid of the square is (15, 15); it must land on the canvas center.
        let (x, y) = projection.project(15.0, 15.0);
        assert!((x - 600.0).abs() < 1e-9);
        assert!((y - 250.0).abs() < 1e-9);
    }

    #[test]
    fn scale_spreads_points_apart() {
        let feature = square_country();
        let near = Projection::for_country(&feature, 150.0, 1200.0, 500.0);
        let far = Projection::for_country(&feature, 300.0, 1200.0, 500.0);
        let (x1, _) = near.project(20.0, 15.0);
        let (x2, _) = far.project(20.0, 15.0);
        assert!((x2 - 600.0).abs() > (x1 - 600.0).abs());
    }
}
