use crate::models::{Compatibility, Facility, FacilityType, Need, NeedType};

/// Optional narrowing applied to needs before the compatibility check
#[derive(Debug, Clone, Copy, Default)]
pub struct NeedFilter {
    pub need_type: Option<NeedType>,
    pub hospital_id: Option<i64>,
    pub active_only: bool,
}

impl NeedFilter {
    #[inline]
    pub fn matches(&self, need: &Need) -> bool {
        if let Some(need_type) = self.need_type {
            if need.need_type != need_type {
                return false;
            }
        }

        if let Some(hospital_id) = self.hospital_id {
            if need.hospital_id != Some(hospital_id) {
                return false;
            }
        }

        !self.active_only || need.status.is_active()
    }
}

/// Check whether a need's blood requirement can be met by the donor
#[inline]
pub fn is_relevant_need(need: &Need, compatibility: &Compatibility) -> bool {
    compatibility.admits(need.required_blood_group.as_deref())
}

/// Select the needs relevant to a donor, preserving input order
pub fn relevant_needs<'a, I>(
    needs: I,
    compatibility: &Compatibility,
    filter: &NeedFilter,
) -> Vec<Need>
where
    I: IntoIterator<Item = &'a Need>,
{
    needs
        .into_iter()
        .filter(|need| filter.matches(need))
        .filter(|need| is_relevant_need(need, compatibility))
        .cloned()
        .collect()
}

/// Check if a facility satisfies an optional type request
#[inline]
pub fn matches_facility_type(facility: &Facility, requested: Option<FacilityType>) -> bool {
    requested.map_or(true, |kind| facility.facility_type.serves(kind))
}
