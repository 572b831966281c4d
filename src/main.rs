use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use lifesaver_match::config::{LoggingSettings, Settings};
use lifesaver_match::core::{Matcher, STANDARD_TABLE};
use lifesaver_match::routes::{self, AppState};
use lifesaver_match::services::{DirectorySource, FacilityDirectory, PostgresClient, SeedData};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Body returned when a request's JSON or query string cannot be extracted
#[derive(Debug, serde::Serialize)]
pub struct PayloadError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for PayloadError {}

impl error::ResponseError for PayloadError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

fn payload_error(kind: &str, detail: impl std::fmt::Display, req: &HttpRequest) -> actix_web::Error {
    info!("Rejected {} on {}: {}", kind, req.path(), detail);
    PayloadError {
        error: format!("invalid_{}", kind),
        message: format!("Invalid {}: {}", kind, detail),
        status_code: 400,
    }
    .into()
}

pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    payload_error("json", err, req)
}

pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    payload_error("query", err, req)
}

/// Initialize logging; `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

async fn build_directory(settings: &Settings) -> std::io::Result<FacilityDirectory> {
    let capacity = settings.directory.snapshot_capacity;
    let ttl = settings.directory.snapshot_ttl_secs;

    if let Some(database) = &settings.database {
        let client = PostgresClient::from_settings(
            &database.url,
            database.max_connections,
            database.min_connections,
            database.acquire_timeout_secs,
            database.idle_timeout_secs,
        )
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;

        info!("PostgreSQL facility directory initialized (snapshot TTL: {}s)", ttl);
        return Ok(FacilityDirectory::new(DirectorySource::Postgres(Arc::new(client)), capacity, ttl));
    }

    let seed = match &settings.directory.seed_path {
        Some(path) => SeedData::load(path).await.map_err(|e| {
            error!("Failed to load seed directory {}: {}", path, e);
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?,
        None => {
            warn!("No database or seed file configured, facility directory is empty");
            SeedData::default()
        }
    };

    Ok(FacilityDirectory::from_seed(seed))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_tracing(&settings.logging);

    info!("Starting LifeSaver matching service...");

    let directory = Arc::new(build_directory(&settings).await?);

    let matcher = Matcher::new(
        &STANDARD_TABLE,
        settings.matching.default_limit,
        settings.matching.max_limit,
    );

    info!("Matcher initialized: {:?}", matcher);

    let app_state = AppState {
        directory,
        matcher,
        matching: settings.matching.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
