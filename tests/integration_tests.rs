// Integration tests for LifeSaver Match

use actix_web::{http::StatusCode, test, web, App};
use lifesaver_match::config::MatchingSettings;
use lifesaver_match::core::{Matcher, STANDARD_TABLE};
use lifesaver_match::models::{
    AccidentRouteResponse, Compatibility, CriticalEmergencyResponse, ErrorResponse, Facility,
    FacilityType, Need, NeedStatus, NeedType, NearbyFacilitiesResponse, RecommendedNeedsResponse,
};
use lifesaver_match::routes::{configure_routes, AppState};
use lifesaver_match::services::{FacilityDirectory, SeedData};
use std::sync::Arc;

fn create_facility(
    id: i64,
    name: &str,
    kind: FacilityType,
    city: &str,
    coords: Option<(f64, f64)>,
) -> Facility {
    Facility {
        id,
        name: name.to_string(),
        facility_type: kind,
        phone: format!("020-555-{:04}", id),
        address: format!("{} Road", name),
        city: city.to_string(),
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
    }
}

fn create_need(id: &str, required: Option<&str>, status: NeedStatus) -> Need {
    Need {
        id: id.to_string(),
        title: format!("Need {}", id),
        description: String::new(),
        need_type: NeedType::Blood,
        required_blood_group: required.map(str::to_string),
        city: "Pune".to_string(),
        status,
        hospital_id: Some(1),
        contact_phone: None,
        needed_by: None,
        reported_by: None,
    }
}

fn seed() -> SeedData {
    SeedData {
        facilities: vec![
            create_facility(1, "Sassoon General", FacilityType::Hospital, "Pune", Some((18.5286, 73.8740))),
            create_facility(2, "Ruby Hall Clinic", FacilityType::Both, "Pune", Some((18.5314, 73.8772))),
            create_facility(3, "KEM Mumbai", FacilityType::Hospital, "Mumbai", Some((19.0028, 72.8423))),
            create_facility(4, "Janakalyan Blood Bank", FacilityType::BloodCenter, "Pune", None),
            create_facility(5, "Nashik Civil", FacilityType::Hospital, "Nashik", None),
        ],
        needs: vec![
            create_need("n1", Some("AB+"), NeedStatus::Open),
            create_need("n2", Some("O-"), NeedStatus::Open),
            Need {
                need_type: NeedType::Platelets,
                hospital_id: Some(2),
                ..create_need("n3", None, NeedStatus::Open)
            },
            create_need("n4", Some("A+"), NeedStatus::Fulfilled),
        ],
    }
}

fn app_state(seed: SeedData) -> AppState {
    AppState {
        directory: Arc::new(FacilityDirectory::from_seed(seed)),
        matcher: Matcher::new(&STANDARD_TABLE, 10, 50),
        matching: MatchingSettings::default(),
    }
}

macro_rules! init_app {
    ($seed:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state($seed)))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_compatibility_endpoint() {
    let app = init_app!(seed());

    let req = test::TestRequest::get()
        .uri("/api/v1/compatibility?blood_group=O-")
        .to_request();
    let compat: Compatibility = test::call_and_read_body_json(&app, req).await;
    assert_eq!(compat.can_donate_to.len(), 8);
    assert!(compat.is_universal);

    // '+' must be percent-encoded in a query string
    let req = test::TestRequest::get()
        .uri("/api/v1/compatibility?blood_group=AB%2B")
        .to_request();
    let compat: Compatibility = test::call_and_read_body_json(&app, req).await;
    assert_eq!(compat.blood_group, "AB+");
    assert_eq!(compat.can_donate_to.len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/compatibility?blood_group=bogus")
        .to_request();
    let compat: Compatibility = test::call_and_read_body_json(&app, req).await;
    assert!(compat.can_donate_to.is_empty());
    assert!(!compat.is_universal);
}

#[actix_web::test]
async fn test_nearby_by_coordinates() {
    let app = init_app!(seed());

    let req = test::TestRequest::get()
        .uri("/api/v1/facilities/nearby?latitude=18.5300&longitude=73.8760&limit=2")
        .to_request();
    let resp: NearbyFacilitiesResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.count, 2);
    let ids: Vec<_> = resp.facilities.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert!(resp.facilities[0].distance.unwrap() <= resp.facilities[1].distance.unwrap());
}

#[actix_web::test]
async fn test_nearby_type_filter() {
    let app = init_app!(seed());

    let req = test::TestRequest::get()
        .uri("/api/v1/facilities/nearby?latitude=18.5286&longitude=73.8740&type=BLOOD_CENTER")
        .to_request();
    let resp: NearbyFacilitiesResponse = test::call_and_read_body_json(&app, req).await;

    // Only the dual-purpose facility has coordinates among blood centers
    let ids: Vec<_> = resp.facilities.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![2]);
}

#[actix_web::test]
async fn test_nearby_invalid_type() {
    let app = init_app!(seed());

    let req = test::TestRequest::get()
        .uri("/api/v1/facilities/nearby?city=Pune&type=CLINIC")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.status_code, 400);
}

#[actix_web::test]
async fn test_nearby_malformed_coordinates_use_city() {
    let app = init_app!(seed());

    let req = test::TestRequest::get()
        .uri("/api/v1/facilities/nearby?latitude=abc&longitude=73.8&city=nashik")
        .to_request();
    let resp: NearbyFacilitiesResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp.count, 1);
    assert_eq!(resp.facilities[0].name, "Nashik Civil");
    assert!(resp.facilities[0].distance.is_none());
}

#[actix_web::test]
async fn test_nearby_zero_and_negative_limit() {
    let app = init_app!(seed());

    for limit in ["0", "-4"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/facilities/nearby?city=Pune&limit={}", limit))
            .to_request();
        let resp: NearbyFacilitiesResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.count, 0);
    }
}

#[actix_web::test]
async fn test_recommended_needs() {
    let app = init_app!(seed());

    let req = test::TestRequest::get()
        .uri("/api/v1/needs/recommended?blood_group=B%2B")
        .to_request();
    let resp: RecommendedNeedsResponse = test::call_and_read_body_json(&app, req).await;

    let ids: Vec<_> = resp.recommended_needs.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["n1", "n3"]);
    assert_eq!(resp.compatibility.blood_group, "B+");

    let req = test::TestRequest::get()
        .uri("/api/v1/needs/recommended?blood_group=O-")
        .to_request();
    let resp: RecommendedNeedsResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp.count, 3);
}

#[actix_web::test]
async fn test_recommended_needs_include_inactive_on_request() {
    let app = init_app!(seed());

    let req = test::TestRequest::get()
        .uri("/api/v1/needs/recommended?blood_group=O-&active_only=false")
        .to_request();
    let resp: RecommendedNeedsResponse = test::call_and_read_body_json(&app, req).await;

    let ids: Vec<_> = resp.recommended_needs.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["n1", "n2", "n3", "n4"]);
    assert_eq!(resp.recommended_needs[3].status, NeedStatus::Fulfilled);
}

#[actix_web::test]
async fn test_recommended_needs_by_type_and_hospital() {
    let app = init_app!(seed());

    let req = test::TestRequest::get()
        .uri("/api/v1/needs/recommended?blood_group=O-&need_type=platelets")
        .to_request();
    let resp: RecommendedNeedsResponse = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<_> = resp.recommended_needs.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["n3"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/needs/recommended?blood_group=O-&hospital=1")
        .to_request();
    let resp: RecommendedNeedsResponse = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<_> = resp.recommended_needs.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["n1", "n2"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/needs/recommended?blood_group=O-&need_type=PLASMA")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_critical_emergency_with_coordinates() {
    let app = init_app!(seed());

    let req = test::TestRequest::post()
        .uri("/api/v1/emergencies/critical")
        .set_json(serde_json::json!({
            "title": "Accident victim needs O- blood",
            "required_blood_group": "O-",
            "city": "Pune",
            "latitude": "18.5290",
            "longitude": 73.8745
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: CriticalEmergencyResponse = test::read_body_json(resp).await;
    assert_eq!(body.ambulance_contact, "112");
    assert_eq!(body.emergency_need.status, NeedStatus::Open);
    assert!(body.emergency_need.needed_by.is_some());
    assert!(body.emergency_need.reported_by.is_none());
    assert_eq!(body.nearby_hospitals.len(), 3);
    assert_eq!(body.nearby_hospitals[0].id, 1);
}

#[actix_web::test]
async fn test_critical_emergency_bad_coordinates_fall_back() {
    let app = init_app!(seed());

    let req = test::TestRequest::post()
        .uri("/api/v1/emergencies/critical")
        .set_json(serde_json::json!({
            "title": "Platelets needed",
            "need_type": "PLATELETS",
            "city": "pune",
            "latitude": "near the bridge",
            "longitude": {"unexpected": true}
        }))
        .to_request();
    let body: CriticalEmergencyResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.emergency_need.need_type, NeedType::Platelets);
    let ids: Vec<_> = body.nearby_hospitals.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
}

#[actix_web::test]
async fn test_critical_emergency_validation() {
    let app = init_app!(seed());

    let req = test::TestRequest::post()
        .uri("/api/v1/emergencies/critical")
        .set_json(serde_json::json!({"title": "", "city": "Pune"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_critical_emergency_blank_city() {
    let app = init_app!(seed());

    let req = test::TestRequest::post()
        .uri("/api/v1/emergencies/critical")
        .set_json(serde_json::json!({"title": "x", "city": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_critical_emergency_overflowing_latitude() {
    let app = init_app!(seed());

    // serde_json::json! cannot hold 1e400, so the body is written by hand
    let req = test::TestRequest::post()
        .uri("/api/v1/emergencies/critical")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"title": "x", "city": "Pune", "latitude": 1e400, "longitude": 73.8}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: CriticalEmergencyResponse = test::read_body_json(resp).await;
    let ids: Vec<_> = body.nearby_hospitals.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
    assert!(body.nearby_hospitals.iter().all(|h| h.distance.is_none()));
}

#[actix_web::test]
async fn test_critical_emergency_echoes_description() {
    let app = init_app!(seed());

    let req = test::TestRequest::post()
        .uri("/api/v1/emergencies/critical")
        .set_json(serde_json::json!({
            "title": "Platelets for dengue patient",
            "description": "Ward 4, two units",
            "city": "Pune"
        }))
        .to_request();
    let body: CriticalEmergencyResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.emergency_need.description, "Ward 4, two units");
}

#[actix_web::test]
async fn test_accident_route_nearest() {
    let app = init_app!(seed());

    let req = test::TestRequest::post()
        .uri("/api/v1/accidents/route")
        .set_json(serde_json::json!({
            "city": "Mumbai",
            "latitude": 19.0,
            "longitude": 72.84
        }))
        .to_request();
    let body: AccidentRouteResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.ambulance_contact, "108");
    let hospital = body.nearest_hospital.expect("a hospital should be routed");
    assert_eq!(hospital.id, 3);
    assert!(body.message.contains("KEM Mumbai"));
}

#[actix_web::test]
async fn test_accident_route_no_match() {
    let app = init_app!(SeedData::default());

    let req = test::TestRequest::post()
        .uri("/api/v1/accidents/route")
        .set_json(serde_json::json!({"city": "Atlantis"}))
        .to_request();
    let body: AccidentRouteResponse = test::call_and_read_body_json(&app, req).await;

    assert!(body.nearest_hospital.is_none());
    assert!(body.message.ends_with("Please contact local hospitals directly."));
}

#[actix_web::test]
async fn test_health() {
    let app = init_app!(seed());

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
}
