use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Facility, Need, NeedStatus, NeedType};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

/// Read-only PostgreSQL client over the platform's facility and need tables
///
/// Rows are returned in insertion order so that ties in proximity ranking
/// resolve the same way on every call.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL facility directory");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Fetch every hospital and blood center
    pub async fn fetch_facilities(&self) -> Result<Vec<Facility>, PostgresError> {
        let query = r#"
            SELECT id::bigint AS id, name, hospital_type, phone, address, city,
                   latitude::float8 AS latitude, longitude::float8 AS longitude
            FROM core_hospital
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        let facilities = rows
            .iter()
            .map(facility_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} facilities", facilities.len());

        Ok(facilities)
    }

    /// Fetch emergency needs followed by hospital needs, in every status
    pub async fn fetch_needs(&self) -> Result<Vec<Need>, PostgresError> {
        let emergency_query = r#"
            SELECT e.id::bigint AS id, e.title, e.description, e.need_type,
                   e.required_blood_group, e.city, e.contact_phone, e.status, e.needed_by,
                   e.created_by_id::bigint AS reporter_id, u.email AS reporter_email
            FROM core_emergencyneed e
            LEFT JOIN core_donorprofile u ON u.id = e.created_by_id
            ORDER BY e.created_at DESC
        "#;

        let hospital_query = r#"
            SELECT n.id::bigint AS id, n.patient_name, n.patient_details, n.need_type,
                   n.required_blood_group, h.city, h.phone, n.status, n.needed_by,
                   n.hospital_id::bigint AS hospital_id
            FROM core_hospitalneed n
            JOIN core_hospital h ON h.id = n.hospital_id
            ORDER BY n.created_at DESC
        "#;

        let emergency_rows = sqlx::query(emergency_query).fetch_all(&self.pool).await?;
        let hospital_rows = sqlx::query(hospital_query).fetch_all(&self.pool).await?;

        let mut needs = Vec::with_capacity(emergency_rows.len() + hospital_rows.len());
        for row in &emergency_rows {
            needs.push(emergency_need_from_row(row)?);
        }
        for row in &hospital_rows {
            needs.push(hospital_need_from_row(row)?);
        }

        tracing::debug!(
            "Loaded {} emergency and {} hospital needs",
            emergency_rows.len(),
            hospital_rows.len()
        );

        Ok(needs)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn facility_from_row(row: &PgRow) -> Result<Facility, PostgresError> {
    let kind: String = row.try_get("hospital_type")?;

    Ok(Facility {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        facility_type: kind.parse().map_err(PostgresError::InvalidRow)?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
    })
}

/// Account that unauthenticated emergency reports were filed under
const ANONYMOUS_REPORTER_EMAIL: &str = "emergency@lifesaver.local";

/// Reporter of an emergency row; the shared anonymous account maps to `None`
fn reporter_identity(email: Option<&str>, reporter_id: Option<i64>) -> Option<String> {
    match email {
        Some(email) if email.eq_ignore_ascii_case(ANONYMOUS_REPORTER_EMAIL) => None,
        _ => reporter_id.map(|id| id.to_string()),
    }
}

fn emergency_need_from_row(row: &PgRow) -> Result<Need, PostgresError> {
    let id: i64 = row.try_get("id")?;
    let need_type: String = row.try_get("need_type")?;
    let status: String = row.try_get("status")?;
    let contact_phone: String = row.try_get("contact_phone")?;
    let reporter_email: Option<String> = row.try_get("reporter_email")?;
    let reporter_id: Option<i64> = row.try_get("reporter_id")?;

    Ok(Need {
        id: format!("emergency-{}", id),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        need_type: need_type.parse().map_err(PostgresError::InvalidRow)?,
        required_blood_group: non_blank(row.try_get("required_blood_group")?),
        city: row.try_get("city")?,
        status: status.parse::<NeedStatus>().map_err(PostgresError::InvalidRow)?,
        hospital_id: None,
        contact_phone: non_blank(Some(contact_phone)),
        needed_by: row.try_get("needed_by")?,
        reported_by: reporter_identity(reporter_email.as_deref(), reporter_id),
    })
}

fn hospital_need_from_row(row: &PgRow) -> Result<Need, PostgresError> {
    let id: i64 = row.try_get("id")?;
    let need_type: String = row.try_get("need_type")?;
    let status: String = row.try_get("status")?;
    let patient: String = row.try_get("patient_name")?;
    let need_type: NeedType = need_type.parse().map_err(PostgresError::InvalidRow)?;

    let title = if patient.trim().is_empty() {
        format!("{:?} need", need_type)
    } else {
        patient
    };

    Ok(Need {
        id: format!("hospital-{}", id),
        title,
        description: row.try_get("patient_details")?,
        need_type,
        required_blood_group: non_blank(row.try_get("required_blood_group")?),
        city: row.try_get("city")?,
        status: status.parse::<NeedStatus>().map_err(PostgresError::InvalidRow)?,
        hospital_id: row.try_get("hospital_id")?,
        contact_phone: non_blank(row.try_get("phone")?),
        needed_by: row.try_get("needed_by")?,
        reported_by: None,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
