use serde::{Deserialize, Serialize};
use crate::models::domain::{Compatibility, FacilityType, Need, RankedFacility};

/// Facility fields exposed to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitySummary {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub hospital_type: FacilityType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distance: Option<f64>,
}

impl From<RankedFacility> for FacilitySummary {
    fn from(ranked: RankedFacility) -> Self {
        let facility = ranked.facility;
        Self {
            id: facility.id,
            name: facility.name,
            phone: facility.phone,
            address: facility.address,
            city: facility.city,
            hospital_type: facility.facility_type,
            distance: ranked.distance,
        }
    }
}

/// Response for nearby facilities endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyFacilitiesResponse {
    pub facilities: Vec<FacilitySummary>,
    pub count: usize,
}

/// Response for recommended needs endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedNeedsResponse {
    pub compatibility: Compatibility,
    pub recommended_needs: Vec<Need>,
    pub count: usize,
}

/// Response for critical emergency submissions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalEmergencyResponse {
    pub message: String,
    pub emergency_need: Need,
    pub nearby_hospitals: Vec<FacilitySummary>,
    pub ambulance_contact: String,
}

/// Response for accident routing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccidentRouteResponse {
    pub message: String,
    pub ambulance_contact: String,
    pub nearest_hospital: Option<FacilitySummary>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
