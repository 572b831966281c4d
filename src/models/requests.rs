use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;
use validator::{Validate, ValidationError};

/// A coordinate as it arrives in a JSON body: number, numeric string, or junk
///
/// Deserialized from the raw JSON text, so numeric literals that overflow
/// `f64` (such as `1e400`) are kept instead of failing the whole body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
    Other(Value),
}

impl<'de> Deserialize<'de> for LooseNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Ok(LooseNumber::from_json_text(raw.get()))
    }
}

impl LooseNumber {
    fn from_json_text(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Number(n)) => match n.as_f64() {
                Some(n) => LooseNumber::Number(n),
                None => LooseNumber::Other(Value::Number(n)),
            },
            Ok(Value::String(s)) => LooseNumber::Text(s),
            Ok(other) => LooseNumber::Other(other),
            // Only an out-of-range numeric literal gets here
            Err(_) => LooseNumber::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LooseNumber::Number(n) => Some(*n),
            LooseNumber::Text(s) => s.trim().parse().ok(),
            LooseNumber::Other(_) => None,
        }
    }
}

/// Query string for `GET /facilities/nearby`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearbyFacilitiesQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "type")]
    pub facility_type: Option<String>,
    pub limit: Option<i64>,
}

/// Query string for `GET /compatibility`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompatibilityQuery {
    #[serde(default)]
    pub blood_group: String,
}

/// Query string for `GET /needs/recommended`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendedNeedsQuery {
    #[serde(default)]
    pub blood_group: String,
    pub need_type: Option<String>,
    #[serde(rename = "hospital")]
    pub hospital_id: Option<i64>,
    pub active_only: Option<bool>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Critical emergency submission, possibly anonymous
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CriticalEmergencyRequest {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub need_type: Option<String>,
    #[serde(default)]
    pub required_blood_group: Option<String>,
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    pub city: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub latitude: Option<LooseNumber>,
    #[serde(default)]
    pub longitude: Option<LooseNumber>,
    #[serde(default)]
    pub needed_by: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub reported_by: Option<String>,
}

/// Accident report asking for the nearest hospital
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AccidentRouteRequest {
    #[serde(default)]
    #[validate(length(max = 120))]
    pub city: String,
    #[serde(default)]
    pub latitude: Option<LooseNumber>,
    #[serde(default)]
    pub longitude: Option<LooseNumber>,
}
