use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{Matcher, NeedFilter};
use crate::models::{
    AccidentRouteRequest, AccidentRouteResponse, CompatibilityQuery, CriticalEmergencyRequest,
    CriticalEmergencyResponse, ErrorResponse, FacilitySummary, FacilityType,
    HealthResponse, LocationQuery, LooseNumber, NearbyFacilitiesQuery, NearbyFacilitiesResponse,
    Need, NeedStatus, NeedType, RecommendedNeedsQuery, RecommendedNeedsResponse,
};
use crate::services::FacilityDirectory;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<FacilityDirectory>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/compatibility", web::get().to(compatibility))
        .route("/facilities/nearby", web::get().to(nearby_facilities))
        .route("/needs/recommended", web::get().to(recommended_needs))
        .route("/emergencies/critical", web::post().to(critical_emergency))
        .route("/accidents/route", web::post().to(accident_route));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

fn directory_unavailable(message: String) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "Facility directory unavailable".to_string(),
        message,
        status_code: 500,
    })
}

fn parse_coordinate(value: Option<&LooseNumber>) -> Option<f64> {
    value.and_then(LooseNumber::as_f64)
}

/// Build the location query for a report, logging when supplied coordinates
/// had to be discarded
fn report_location(
    latitude: Option<&LooseNumber>,
    longitude: Option<&LooseNumber>,
    city: &str,
) -> Option<LocationQuery> {
    let query = LocationQuery::from_parts(
        parse_coordinate(latitude),
        parse_coordinate(longitude),
        Some(city),
    );

    let supplied = latitude.is_some() || longitude.is_some();
    if supplied && !matches!(query, Some(LocationQuery::Coordinates { .. })) {
        tracing::warn!(
            "Unusable coordinates in report (lat={:?}, lon={:?}), falling back to city {:?}",
            latitude,
            longitude,
            city
        );
    }

    query
}

/// Facilities near `query`, or an empty list if the directory cannot be read
async fn nearby_or_empty(
    state: &AppState,
    query: Option<&LocationQuery>,
    limit: usize,
) -> Vec<FacilitySummary> {
    let Some(query) = query else {
        return Vec::new();
    };

    match state.directory.facilities().await {
        Ok(facilities) => state
            .matcher
            .nearest(query, &facilities, None, limit)
            .into_iter()
            .map(FacilitySummary::from)
            .collect(),
        Err(e) => {
            tracing::error!("Failed to load facilities for emergency routing: {}", e);
            Vec::new()
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.directory.health_check().await;

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Donor compatibility
///
/// GET /api/v1/compatibility?blood_group=O-
///
/// Unknown groups yield an empty `can_donate_to`.
async fn compatibility(
    state: web::Data<AppState>,
    query: web::Query<CompatibilityQuery>,
) -> impl Responder {
    let compatibility = state.matcher.compatibility(&query.blood_group);

    tracing::debug!(
        "Compatibility for {:?}: {} groups",
        query.blood_group,
        compatibility.can_donate_to.len()
    );

    HttpResponse::Ok().json(compatibility)
}

/// Nearby facilities
///
/// GET /api/v1/facilities/nearby?latitude=18.52&longitude=73.85&city=Pune&type=BLOOD_CENTER&limit=5
///
/// Coordinates that do not parse are ignored and the city is used instead.
async fn nearby_facilities(
    state: web::Data<AppState>,
    query: web::Query<NearbyFacilitiesQuery>,
) -> impl Responder {
    let facility_type = match query.facility_type.as_deref().map(str::parse::<FacilityType>) {
        None => None,
        Some(Ok(kind)) => Some(kind),
        Some(Err(message)) => return bad_request("Invalid facility type", message),
    };

    let limit = state.matcher.effective_limit(query.limit);
    let location = LocationQuery::from_raw(
        query.latitude.as_deref(),
        query.longitude.as_deref(),
        query.city.as_deref(),
    );

    let Some(location) = location else {
        tracing::debug!("Nearby search without usable location, returning no facilities");
        return HttpResponse::Ok().json(NearbyFacilitiesResponse {
            facilities: Vec::new(),
            count: 0,
        });
    };

    let facilities = match state.directory.facilities().await {
        Ok(facilities) => facilities,
        Err(e) => {
            tracing::error!("Failed to load facilities: {}", e);
            return directory_unavailable(e.to_string());
        }
    };

    let facilities: Vec<FacilitySummary> = state
        .matcher
        .nearest(&location, &facilities, facility_type, limit)
        .into_iter()
        .map(FacilitySummary::from)
        .collect();

    tracing::info!(
        "Returning {} facilities for {:?} (limit {})",
        facilities.len(),
        location,
        limit
    );

    HttpResponse::Ok().json(NearbyFacilitiesResponse {
        count: facilities.len(),
        facilities,
    })
}

/// Needs a donor can help with
///
/// GET /api/v1/needs/recommended?blood_group=B%2B&need_type=BLOOD&hospital=3&active_only=true
async fn recommended_needs(
    state: web::Data<AppState>,
    query: web::Query<RecommendedNeedsQuery>,
) -> impl Responder {
    let need_type = match query.need_type.as_deref().map(str::parse::<NeedType>) {
        None => None,
        Some(Ok(kind)) => Some(kind),
        Some(Err(message)) => return bad_request("Invalid need type", message),
    };

    let filter = NeedFilter {
        need_type,
        hospital_id: query.hospital_id,
        active_only: query.active_only.unwrap_or(true),
    };

    let needs = match state.directory.needs().await {
        Ok(needs) => needs,
        Err(e) => {
            tracing::error!("Failed to load needs: {}", e);
            return directory_unavailable(e.to_string());
        }
    };

    let recommendation = state.matcher.recommend(&query.blood_group, needs.iter(), &filter);

    tracing::info!(
        "Recommending {} of {} needs for blood group {:?}",
        recommendation.needs.len(),
        needs.len(),
        query.blood_group
    );

    HttpResponse::Ok().json(RecommendedNeedsResponse {
        compatibility: recommendation.compatibility,
        count: recommendation.needs.len(),
        recommended_needs: recommendation.needs,
    })
}

/// Critical emergency submission
///
/// POST /api/v1/emergencies/critical
///
/// Request body:
/// ```json
/// {
///   "title": "string",
///   "need_type": "BLOOD|PLATELETS|ORGAN|FUNDS|EMERGENCY|OTHER",
///   "required_blood_group": "O-",
///   "city": "string",
///   "latitude": 18.52,
///   "longitude": "73.85",
///   "reported_by": null
/// }
/// ```
async fn critical_emergency(
    state: web::Data<AppState>,
    req: web::Json<CriticalEmergencyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for critical emergency: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let req = req.into_inner();

    let need_type = match req.need_type.as_deref().map(str::parse::<NeedType>) {
        None => NeedType::Blood,
        Some(Ok(kind)) => kind,
        Some(Err(message)) => return bad_request("Invalid need type", message),
    };

    let location = report_location(req.latitude.as_ref(), req.longitude.as_ref(), &req.city);
    let nearby_hospitals =
        nearby_or_empty(&state, location.as_ref(), state.matching.emergency_limit).await;

    let need = Need {
        id: uuid::Uuid::new_v4().to_string(),
        title: req.title,
        description: req.description,
        need_type,
        required_blood_group: req.required_blood_group.filter(|g| !g.trim().is_empty()),
        city: req.city,
        status: NeedStatus::Open,
        hospital_id: None,
        contact_phone: req.contact_phone,
        needed_by: Some(
            req.needed_by
                .unwrap_or_else(|| chrono::Utc::now() + chrono::Duration::hours(1)),
        ),
        reported_by: req.reported_by,
    };

    tracing::info!(
        "Critical emergency {} in {} routed to {} hospitals",
        need.id,
        need.city,
        nearby_hospitals.len()
    );

    HttpResponse::Created().json(CriticalEmergencyResponse {
        message: "Critical emergency need created! Nearby hospitals and blood banks have been notified."
            .to_string(),
        emergency_need: need,
        nearby_hospitals,
        ambulance_contact: state.matching.emergency_contact.clone(),
    })
}

/// Nearest hospital for an accident report
///
/// POST /api/v1/accidents/route
async fn accident_route(
    state: web::Data<AppState>,
    req: web::Json<AccidentRouteRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let location = report_location(req.latitude.as_ref(), req.longitude.as_ref(), &req.city);
    let nearest_hospital = nearby_or_empty(&state, location.as_ref(), 1)
        .await
        .into_iter()
        .next();

    let mut message = "Emergency alert sent! Ambulance and hospital have been notified.".to_string();
    match &nearest_hospital {
        Some(hospital) => {
            tracing::info!(
                "Accident in {:?} routed to hospital {} ({})",
                req.city,
                hospital.id,
                hospital.name
            );
            message.push_str(&format!(" Nearest hospital ({}) has been alerted.", hospital.name));
        }
        None => {
            tracing::warn!("No hospital found for accident in {:?}", req.city);
            message.push_str(" Please contact local hospitals directly.");
        }
    }

    HttpResponse::Ok().json(AccidentRouteResponse {
        message,
        ambulance_contact: state.matching.ambulance_contact.clone(),
        nearest_hospital,
    })
}
