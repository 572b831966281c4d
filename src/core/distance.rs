use crate::models::Coordinates;

/// Miles per degree of latitude used by the legacy approximation
const MILES_PER_DEGREE: f64 = 69.1;

/// Degrees per radian, rounded as in the legacy approximation
const DEGREES_PER_RADIAN: f64 = 57.3;

/// Approximate planar distance score between a query point and a facility.
///
/// Equirectangular approximation in miles. The longitude term is scaled by
/// the cosine of the *candidate's* latitude, not the query's. Adequate for
/// short-range routing only; not geodesic.
///
/// # Arguments
/// * `query` - The point being searched from
/// * `candidate` - The facility location
#[inline]
pub fn approximate_distance(query: Coordinates, candidate: Coordinates) -> f64 {
    let delta_lat = MILES_PER_DEGREE * (candidate.latitude - query.latitude);
    let delta_lon = MILES_PER_DEGREE
        * (candidate.longitude - query.longitude)
        * (candidate.latitude / DEGREES_PER_RADIAN).cos();

    (delta_lat.powi(2) + delta_lon.powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    #[test]
    fn test_zero_distance() {
        let pune = point(18.5204, 73.8567);
        assert!(approximate_distance(pune, pune) < 1e-9);
    }

    #[test]
    fn test_one_degree_latitude() {
        let d = approximate_distance(point(10.0, 20.0), point(11.0, 20.0));
        assert!((d - 69.1).abs() < 1e-9);
    }

    #[test]
    fn test_pune_to_mumbai() {
        // Roughly 75 miles apart
        let pune = point(18.5204, 73.8567);
        let mumbai = point(19.0760, 72.8777);
        let d = approximate_distance(pune, mumbai);
        assert!(d > 60.0 && d < 90.0, "Distance should be ~75mi, got {}", d);
    }

    #[test]
    fn test_cosine_uses_candidate_latitude() {
        let query = point(0.0, 0.0);
        let candidate = point(60.0, 1.0);
        let expected_lon = 69.1 * (60.0_f64 / 57.3).cos();
        let expected = ((69.1 * 60.0_f64).powi(2) + expected_lon.powi(2)).sqrt();
        assert!((approximate_distance(query, candidate) - expected).abs() < 1e-9);
        // Swapping the endpoints changes the score
        assert!(
            (approximate_distance(candidate, query) - approximate_distance(query, candidate)).abs()
                > 1e-6
        );
    }
}
