use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// ABO/Rh blood group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BloodGroup {
    ONeg,
    OPos,
    ANeg,
    APos,
    BNeg,
    BPos,
    AbNeg,
    AbPos,
}

impl BloodGroup {
    /// All groups in canonical order
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::ONeg,
        BloodGroup::OPos,
        BloodGroup::ANeg,
        BloodGroup::APos,
        BloodGroup::BNeg,
        BloodGroup::BPos,
        BloodGroup::AbNeg,
        BloodGroup::AbPos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::ONeg => "O-",
            BloodGroup::OPos => "O+",
            BloodGroup::ANeg => "A-",
            BloodGroup::APos => "A+",
            BloodGroup::BNeg => "B-",
            BloodGroup::BPos => "B+",
            BloodGroup::AbNeg => "AB-",
            BloodGroup::AbPos => "AB+",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown blood group: {0:?}")]
pub struct UnknownBloodGroup(pub String);

impl FromStr for BloodGroup {
    type Err = UnknownBloodGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        BloodGroup::ALL
            .iter()
            .copied()
            .find(|group| group.as_str() == normalized)
            .ok_or_else(|| UnknownBloodGroup(s.to_string()))
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BloodGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BloodGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A validated latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Returns `None` for non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        valid.then_some(Self { latitude, longitude })
    }
}

/// Kind of facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FacilityType {
    #[default]
    Hospital,
    BloodCenter,
    Both,
}

impl FacilityType {
    /// Whether a facility of this type satisfies a request for `requested`
    pub fn serves(&self, requested: FacilityType) -> bool {
        *self == FacilityType::Both || *self == requested
    }
}

impl FromStr for FacilityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HOSPITAL" => Ok(FacilityType::Hospital),
            "BLOOD_CENTER" => Ok(FacilityType::BloodCenter),
            "BOTH" => Ok(FacilityType::Both),
            other => Err(format!("unknown facility type: {}", other)),
        }
    }
}

/// Hospital or blood center record, as supplied by the facility directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    #[serde(alias = "hospital_type", default)]
    pub facility_type: FacilityType,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Facility {
    /// Location of the facility, if both coordinates are present and valid
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
            _ => None,
        }
    }
}

/// Where to look for facilities
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Rank by distance; `city` is used only if no candidate has coordinates
    Coordinates {
        point: Coordinates,
        city: Option<String>,
    },
    /// Case-insensitive substring match on the facility city
    CityFilter { text: String },
}

impl LocationQuery {
    /// Decide the query shape from loosely typed inputs.
    ///
    /// Unparseable or out-of-range coordinates are dropped, leaving the city
    /// token as the only criterion. Returns `None` when nothing usable remains.
    pub fn from_raw(
        latitude: Option<&str>,
        longitude: Option<&str>,
        city: Option<&str>,
    ) -> Option<Self> {
        let parse = |value: Option<&str>| value.and_then(|v| v.trim().parse::<f64>().ok());
        Self::from_parts(parse(latitude), parse(longitude), city)
    }

    /// Same as [`LocationQuery::from_raw`] for already numeric inputs
    pub fn from_parts(
        latitude: Option<f64>,
        longitude: Option<f64>,
        city: Option<&str>,
    ) -> Option<Self> {
        let city = city
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let point = match (latitude, longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
            _ => None,
        };

        match (point, city) {
            (Some(point), city) => Some(LocationQuery::Coordinates { point, city }),
            (None, Some(text)) => Some(LocationQuery::CityFilter { text }),
            (None, None) => None,
        }
    }

    pub fn city(&self) -> Option<&str> {
        match self {
            LocationQuery::Coordinates { city, .. } => city.as_deref(),
            LocationQuery::CityFilter { text } => Some(text),
        }
    }
}

/// A facility with its approximate distance from the query point.
///
/// `distance` is `None` when the facility was found by city match.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedFacility {
    pub facility: Facility,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum NeedType {
    #[default]
    Blood,
    Platelets,
    Organ,
    Funds,
    Emergency,
    Other,
}

impl FromStr for NeedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BLOOD" => Ok(NeedType::Blood),
            "PLATELETS" => Ok(NeedType::Platelets),
            "ORGAN" => Ok(NeedType::Organ),
            "FUNDS" => Ok(NeedType::Funds),
            "EMERGENCY" => Ok(NeedType::Emergency),
            "OTHER" => Ok(NeedType::Other),
            other => Err(format!("unknown need type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum NeedStatus {
    #[default]
    Open,
    Urgent,
    Normal,
    Fulfilled,
    Cancelled,
}

impl NeedStatus {
    pub fn is_active(&self) -> bool {
        !matches!(self, NeedStatus::Fulfilled | NeedStatus::Cancelled)
    }
}

impl FromStr for NeedStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(NeedStatus::Open),
            "URGENT" => Ok(NeedStatus::Urgent),
            "NORMAL" => Ok(NeedStatus::Normal),
            "FULFILLED" => Ok(NeedStatus::Fulfilled),
            "CANCELLED" => Ok(NeedStatus::Cancelled),
            other => Err(format!("unknown need status: {}", other)),
        }
    }
}

/// An emergency or hospital need from the need store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Need {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub need_type: NeedType,
    /// Raw stored value; blank means the need is group-agnostic
    #[serde(default)]
    pub required_blood_group: Option<String>,
    pub city: String,
    #[serde(default)]
    pub status: NeedStatus,
    #[serde(default)]
    pub hospital_id: Option<i64>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub needed_by: Option<chrono::DateTime<chrono::Utc>>,
    /// `None` for anonymous submissions
    #[serde(default)]
    pub reported_by: Option<String>,
}

/// Donor compatibility result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compatibility {
    pub blood_group: String,
    pub can_donate_to: Vec<BloodGroup>,
    pub is_universal: bool,
}
