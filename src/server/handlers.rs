use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

use crate::cultures::CultureRegistry;
use crate::diet::DietRules;
use crate::settings;

use super::models::{
    CultureQuery, CultureResponse, DietRulesResponse, ErrorResponse, GenerateMealsRequest,
    GenerateMealsResponse, TranslateRequest, TranslateResponse,
};
use super::service::{generate_request, translate_request};
use super::state::ServerState;

pub async fn run_server(settings: settings::Settings, addr: String) -> Result<()> {
    let state = Arc::new(ServerState {
        settings,
        cultures: CultureRegistry::load()?,
        rules: DietRules::load()?,
    });
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| "failed to bind server address")?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate-meals", post(generate_meals))
        .route("/api/translate", post(translate))
        .route("/cultures", get(cultures))
        .route("/diet-rules", get(diet_rules))
        .with_state(state)
        .layer(axum::middleware::from_fn(cors_middleware))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn cors_middleware(req: Request<Body>, next: Next) -> Result<Response<Body>, StatusCode> {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return Ok(response);
    }
    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    Ok(response)
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type,authorization"),
    );
}

async fn generate_meals(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<GenerateMealsRequest>,
) -> Result<Json<GenerateMealsResponse>, (StatusCode, Json<ErrorResponse>)> {
    match generate_request(state.as_ref(), payload).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => Err((err.status, Json(ErrorResponse { error: err.message }))),
    }
}

async fn translate(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, (StatusCode, Json<ErrorResponse>)> {
    match translate_request(state.as_ref(), payload).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => Err((err.status, Json(ErrorResponse { error: err.message }))),
    }
}

async fn cultures(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<CultureQuery>,
) -> Json<CultureResponse> {
    let culture = query.culture.unwrap_or_default();
    let registry = &state.cultures;
    Json(CultureResponse {
        dialects: registry
            .dialects_for(&culture)
            .map(|options| options.to_vec()),
        default_language_code: registry.default_language_code(&culture).to_string(),
        preferred_language_code: registry.preferred_language_code(&culture).to_string(),
    })
}

async fn diet_rules(State(state): State<Arc<ServerState>>) -> Json<DietRulesResponse> {
    let rules = &state.rules;
    Json(DietRulesResponse {
        allowed: rules.allowed.clone(),
        avoid: rules.avoid.clone(),
        tips: rules.tips.clone(),
        grounding_text: rules.grounding_text(),
    })
}
