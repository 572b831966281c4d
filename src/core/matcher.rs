use crate::core::{
    compatibility::{CompatibilityTable, STANDARD_TABLE},
    filters::{matches_facility_type, relevant_needs, NeedFilter},
    proximity::nearest_facilities,
};
use crate::models::{Compatibility, Facility, FacilityType, LocationQuery, Need, RankedFacility};

/// Donor recommendation result
#[derive(Debug)]
pub struct Recommendation {
    pub compatibility: Compatibility,
    pub needs: Vec<Need>,
}

/// Matching entry point used by the request handlers
///
/// Holds a reference to the frozen compatibility table and the result limits;
/// every method is a pure function of its arguments.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    table: &'static CompatibilityTable,
    default_limit: usize,
    max_limit: usize,
}

impl Matcher {
    pub fn new(table: &'static CompatibilityTable, default_limit: usize, max_limit: usize) -> Self {
        Self {
            table,
            default_limit,
            max_limit: max_limit.max(1),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&STANDARD_TABLE, 10, 50)
    }

    /// Resolve the compatibility object for a raw blood group
    pub fn compatibility(&self, blood_group: &str) -> Compatibility {
        self.table.resolve(blood_group)
    }

    /// Needs relevant to a donor of `blood_group`
    pub fn recommend<'a, I>(&self, blood_group: &str, needs: I, filter: &NeedFilter) -> Recommendation
    where
        I: IntoIterator<Item = &'a Need>,
    {
        let compatibility = self.compatibility(blood_group);
        let needs = relevant_needs(needs, &compatibility, filter);

        Recommendation { compatibility, needs }
    }

    /// Normalize a caller-supplied limit.
    ///
    /// Missing → default, zero or negative → 0, anything above the cap is
    /// clamped.
    pub fn effective_limit(&self, requested: Option<i64>) -> usize {
        match requested {
            None => self.default_limit.min(self.max_limit),
            Some(n) if n <= 0 => 0,
            Some(n) => usize::try_from(n).unwrap_or(usize::MAX).min(self.max_limit),
        }
    }

    /// Closest facilities of the requested type
    pub fn nearest(
        &self,
        query: &LocationQuery,
        candidates: &[Facility],
        facility_type: Option<FacilityType>,
        limit: usize,
    ) -> Vec<RankedFacility> {
        if facility_type.is_none() {
            return nearest_facilities(query, candidates, limit);
        }

        let typed: Vec<Facility> = candidates
            .iter()
            .filter(|facility| matches_facility_type(facility, facility_type))
            .cloned()
            .collect();

        nearest_facilities(query, &typed, limit)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}
