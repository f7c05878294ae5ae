//! Out-and-back detour distance from a route.
//!
//! Distances use an equirectangular projection centred on the place, which is
//! accurate at city and regional scale. Long segments and polar routes drift;
//! the approximation is kept for parity with the rest of the platform.

use super::LatLon;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Round-trip detour, in kilometres, from the nearest point of `route` to
/// `point` and back.
///
/// Returns `0.0` when the route has fewer than two points or no finite
/// distance can be computed. The result is rounded to three decimals.
///
/// # Examples
/// ```
/// use roadify_places::domain::geometry::{LatLon, detour::detour_km};
///
/// let route = [LatLon::new(0.0, 0.0), LatLon::new(0.0, 1.0)];
/// let detour = detour_km(LatLon::new(0.01, 0.5), &route);
/// assert!((detour - 2.224).abs() < 1e-3);
/// assert_eq!(detour_km(LatLon::new(0.01, 0.5), &route[..1]), 0.0);
/// ```
#[must_use]
pub fn detour_km(point: LatLon, route: &[LatLon]) -> f64 {
    let nearest = route
        .windows(2)
        .map(|segment| distance_to_segment_km(point, segment[0], segment[1]))
        .fold(f64::INFINITY, f64::min);

    if nearest.is_finite() {
        round3(2.0 * nearest)
    } else {
        0.0
    }
}

/// Local planar coordinates in kilometres, with `origin` at (0, 0).
#[derive(Debug, Clone, Copy)]
struct Planar {
    x: f64,
    y: f64,
}

impl Planar {
    fn project(coordinate: LatLon, origin: LatLon) -> Self {
        let origin_lat = origin.latitude.to_radians();
        Self {
            x: (coordinate.longitude - origin.longitude).to_radians()
                * origin_lat.cos()
                * EARTH_RADIUS_KM,
            y: (coordinate.latitude - origin.latitude).to_radians() * EARTH_RADIUS_KM,
        }
    }

    fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }
}

fn distance_to_segment_km(point: LatLon, start: LatLon, end: LatLon) -> f64 {
    let a = Planar::project(start, point);
    let b = Planar::project(end, point);
    let vx = b.x - a.x;
    let vy = b.y - a.y;

    // The place sits at the origin, so w = -a.
    let along = -a.x * vx - a.y * vy;
    if along <= 0.0 {
        return a.norm();
    }
    let length_sq = vx * vx + vy * vy;
    if length_sq <= along {
        return b.norm();
    }

    let t = along / length_sq;
    Planar {
        x: a.x + t * vx,
        y: a.y + t * vy,
    }
    .norm()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::polyline::decode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn route() -> Vec<LatLon> {
        decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@")
    }

    #[rstest]
    #[case(LatLon::new(38.5, -120.2))]
    #[case(LatLon::new(40.7, -120.95))]
    #[case(LatLon::new(43.252, -126.453))]
    fn vertices_have_no_detour(route: Vec<LatLon>, #[case] point: LatLon) {
        assert!(detour_km(point, &route) < 1e-3);
    }

    #[rstest]
    fn midpoint_of_segment_has_near_zero_detour() {
        let route = [LatLon::new(45.0, 7.0), LatLon::new(45.0, 7.2)];
        assert!(detour_km(LatLon::new(45.0, 7.1), &route) < 1e-3);
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::single(vec![LatLon::new(38.5, -120.2)])]
    fn short_routes_yield_exactly_zero(#[case] route: Vec<LatLon>) {
        assert_eq!(detour_km(LatLon::new(10.0, 10.0), &route), 0.0);
    }

    #[rstest]
    #[case(LatLon::new(39.0, -121.0))]
    #[case(LatLon::new(-10.0, 50.0))]
    #[case(LatLon::new(42.0, -125.0))]
    fn detour_is_never_negative(route: Vec<LatLon>, #[case] point: LatLon) {
        assert!(detour_km(point, &route) >= 0.0);
    }

    #[rstest]
    fn detour_is_twice_perpendicular_distance() {
        // One hundredth of a degree of latitude is about 1.112 km.
        let route = [LatLon::new(0.0, 0.0), LatLon::new(0.0, 1.0)];
        let detour = detour_km(LatLon::new(0.01, 0.5), &route);
        assert!((detour - 2.224).abs() < 1e-3, "got {detour}");
    }

    #[rstest]
    fn clamps_to_segment_endpoints() {
        let route = [LatLon::new(0.0, 0.0), LatLon::new(0.0, 1.0)];
        let beyond_end = detour_km(LatLon::new(0.0, 1.01), &route);
        let beside_end = detour_km(LatLon::new(0.01, 1.0), &route);
        assert!((beyond_end - beside_end).abs() < 1e-3);
    }

    #[rstest]
    fn picks_nearest_segment() {
        let route = [
            LatLon::new(0.0, 0.0),
            LatLon::new(0.0, 1.0),
            LatLon::new(1.0, 1.0),
        ];
        let detour = detour_km(LatLon::new(0.5, 1.001), &route);
        assert!(detour < 0.25, "got {detour}");
    }

    #[rstest]
    fn rounds_to_three_decimals() {
        let route = [LatLon::new(0.0, 0.0), LatLon::new(0.0, 1.0)];
        let detour = detour_km(LatLon::new(0.0123, 0.5), &route);
        assert_eq!(detour, round3(detour));
    }

    #[rstest]
    fn non_finite_route_yields_zero() {
        let route = [LatLon::new(f64::NAN, 0.0), LatLon::new(f64::NAN, 1.0)];
        assert_eq!(detour_km(LatLon::new(0.0, 0.5), &route), 0.0);
    }
}
