// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BloodGroup, Compatibility, Coordinates, Facility, FacilityType, LocationQuery, Need, NeedStatus,
    NeedType, RankedFacility, UnknownBloodGroup,
};
pub use requests::{
    AccidentRouteRequest, CompatibilityQuery, CriticalEmergencyRequest, LooseNumber,
    NearbyFacilitiesQuery, RecommendedNeedsQuery,
};
pub use responses::{
    AccidentRouteResponse, CriticalEmergencyResponse, ErrorResponse, FacilitySummary,
    HealthResponse, NearbyFacilitiesResponse, RecommendedNeedsResponse,
};
