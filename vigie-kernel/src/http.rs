/**
 * API REST VIGIE - Serveur HTTP du service d'inventaire
 *
 * RÔLE :
 * Ce module expose l'inventaire du parc et les propriétés système locales.
 * Interface unique entre les consommateurs (dashboard, scripts) et le service.
 *
 * FONCTIONNEMENT :
 * - Serveur Axum, routes : /health, /system/health, /systems, /systems/{hostname}, /properties
 * - Configuration (maintenance, email, port) recapturée à CHAQUE requête
 * - Mode maintenance : les routes métier répondent 503 + email de contact
 * - Réponses JSON, erreurs terminales en texte brut (404, 503)
 *
 * SÉCURITÉ :
 * - Header x-api-key requis sur toutes les routes sauf /health quand VIGIE_API_KEY est définie
 * - Sans VIGIE_API_KEY le service reste ouvert (LAN de confiance)
 */

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::config::ConfigSnapshot;
use crate::health::KernelHealth;
use crate::models::{InventoryRecord, PropertySet};
use crate::state::AppState;
use crate::system;

/// Erreurs terminales visibles par le client ; le texte Display est le corps de la réponse
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("ERROR: Unknown hostname or the resource may not be running on the host machine")]
    UnknownHost,
    #[error("ERROR: Service is currently in maintenance. Please contact: {contact}")]
    Maintenance { contact: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::UnknownHost => StatusCode::NOT_FOUND,
            ApiError::Maintenance { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Debug, Serialize)]
struct InventoryView {
    hostname: String,
    collected_at: String,    // format RFC3339 pour l'API
    stale: bool,             // true si aucun rafraîchissement depuis 3 cycles
    properties: PropertySet,
}

fn to_view(record: &InventoryRecord, stale_after: Duration) -> InventoryView {
    let age = OffsetDateTime::now_utc() - record.collected_at;
    InventoryView {
        hostname: record.hostname.clone(),
        collected_at: record.collected_at.format(&Rfc3339).unwrap_or_default(),
        stale: age > stale_after,
        properties: record.properties.clone(),
    }
}

async fn require_api_key(req: Request, next: Next) -> Result<Response, StatusCode> {
    // Health check toujours accessible
    if req.uri().path().starts_with("/health") {
        return Ok(next.run(req).await);
    }

    let expected = std::env::var("VIGIE_API_KEY").unwrap_or_default();
    if expected.is_empty() {
        // pas de clé configurée : service ouvert
        return Ok(next.run(req).await);
    }

    let ok = req
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);

    if !ok {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(req).await)
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/system/health", get(get_system_health))
        .route("/systems", get(get_systems))
        .route("/systems/{hostname}", get(get_system))
        .route("/properties", get(get_properties))
        .with_state(app_state)
        .layer(middleware::from_fn(require_api_key))
}

fn guard_maintenance(snapshot: &ConfigSnapshot) -> Result<(), ApiError> {
    if snapshot.in_maintenance {
        return Err(ApiError::Maintenance { contact: snapshot.contact_email.clone() });
    }
    Ok(())
}

// GET /systems (liste)
async fn get_systems(State(app): State<AppState>) -> Result<Json<Vec<InventoryView>>, ApiError> {
    let base = app.cfg.lock().clone();
    let snapshot = ConfigSnapshot::capture(&base);
    guard_maintenance(&snapshot)?;

    let stale_after = Duration::seconds((base.scout.interval_secs * 3) as i64);
    let views = app
        .inventory
        .snapshot()
        .iter()
        .map(|record| to_view(record, stale_after))
        .collect();
    Ok(Json(views))
}

// GET /systems/{hostname} (détail : PropertySet brut, tel qu'enregistré)
async fn get_system(
    State(app): State<AppState>,
    Path(hostname): Path<String>,
) -> Result<Json<PropertySet>, ApiError> {
    let base = app.cfg.lock().clone();
    let snapshot = ConfigSnapshot::capture(&base);
    guard_maintenance(&snapshot)?;

    app.inventory.get(&hostname).map(Json).ok_or(ApiError::UnknownHost)
}

// GET /properties (propriétés système du processus courant)
async fn get_properties(State(app): State<AppState>) -> Result<Json<PropertySet>, ApiError> {
    let base = app.cfg.lock().clone();
    let snapshot = ConfigSnapshot::capture(&base);
    guard_maintenance(&snapshot)?;

    Ok(Json(system::collect_properties()))
}

// GET /system/health (état du service)
async fn get_system_health(State(app): State<AppState>) -> Json<KernelHealth> {
    let base = app.cfg.lock().clone();
    let snapshot = ConfigSnapshot::capture(&base);
    Json(app.health_tracker.get_health(&app.inventory, &snapshot))
}
