//! # API REST
//!
//! REST API implementation for the patient service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON envelopes, status codes, CORS, request tracing)
//!
//! Uses `api-shared` for wire types and `patient-core` for everything else.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod patients;

pub use error::ApiError;

use api_shared::{
    ErrorEnvelope, FieldErrors, HealthRes, HealthService, PatientEnvelope, PatientListEnvelope,
    PatientReq, PatientRes,
};
use axum::{response::Json, routing::get, Router};
use patient_core::PatientService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server
///
/// Holds the lifecycle service every `/patient` handler delegates to.
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

impl AppState {
    pub fn new(patient_service: PatientService) -> Self {
        Self { patient_service }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Patient Service API", version = "1.0"),
    paths(
        health,
        patients::list_patients,
        patients::get_patient,
        patients::create_patient,
        patients::update_patient,
        patients::delete_patient,
    ),
    components(schemas(
        HealthRes,
        PatientReq,
        PatientRes,
        FieldErrors,
        PatientEnvelope,
        PatientListEnvelope,
        ErrorEnvelope,
    ))
)]
pub struct ApiDoc;

/// Builds the full REST application.
///
/// Routes:
/// - `GET /health`
/// - `GET|POST /patient`
/// - `GET|PUT|DELETE /patient/:id`
/// - `/swagger-ui` and `/api-docs/openapi.json`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/patient",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/patient/:id",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}
