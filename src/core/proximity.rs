use crate::core::distance::approximate_distance;
use crate::models::{Facility, LocationQuery, RankedFacility};

/// Rank facilities by approximate distance from the query, closest first.
///
/// Only facilities with both coordinates take part in the ranking. When the
/// query has no coordinates, or no candidate does, facilities whose city
/// contains the query's city token (case-insensitive) are returned in input
/// order instead. A `limit` of zero yields nothing.
pub fn nearest_facilities(
    query: &LocationQuery,
    candidates: &[Facility],
    limit: usize,
) -> Vec<RankedFacility> {
    if limit == 0 {
        return Vec::new();
    }

    if let LocationQuery::Coordinates { point, .. } = query {
        let mut ranked: Vec<RankedFacility> = candidates
            .iter()
            .filter_map(|facility| {
                facility.coordinates().map(|location| RankedFacility {
                    facility: facility.clone(),
                    distance: Some(approximate_distance(*point, location)),
                })
            })
            .collect();

        if !ranked.is_empty() {
            // Stable: equal scores keep candidate order
            ranked.sort_by(|a, b| {
                let a = a.distance.unwrap_or(f64::INFINITY);
                let b = b.distance.unwrap_or(f64::INFINITY);
                a.total_cmp(&b)
            });
            ranked.truncate(limit);
            return ranked;
        }

        tracing::debug!("No facility has coordinates, falling back to city match");
    }

    match query.city() {
        Some(city) => city_matches(city, candidates, limit),
        None => Vec::new(),
    }
}

/// Case-insensitive substring match on the facility city
fn city_matches(city: &str, candidates: &[Facility], limit: usize) -> Vec<RankedFacility> {
    let needle = city.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    candidates
        .iter()
        .filter(|facility| facility.city.to_lowercase().contains(&needle))
        .take(limit)
        .map(|facility| RankedFacility {
            facility: facility.clone(),
            distance: None,
        })
        .collect()
}
