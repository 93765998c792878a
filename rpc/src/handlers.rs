//! Request handlers.
//!
//! Engine calls touch the store synchronously, so every handler runs its
//! engine work on the blocking pool and records the outcome.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::{Deserialize, Serialize};

use reclaim_claims::projection::project_item;
use reclaim_claims::{
    ClaimAnswers, ClaimEngine, ClaimError, ClaimSubmission, ClaimView, DecisionPayload,
    FoundItemReport, ItemPatch, ItemView, LostItemReport,
};
use reclaim_store::{ItemFilter, Store};
use reclaim_types::{ClaimId, ItemId, ItemStatus, ItemType};

use crate::error::ApiError;
use crate::identity::Caller;
use crate::metrics::RequestMetrics;
use crate::pagination::{next_cursor, PaginationMeta, PaginationParams};

/// Shared state handed to every handler.
pub struct AppState<S> {
    pub engine: Arc<ClaimEngine<S>>,
    pub metrics: Arc<RequestMetrics>,
    /// `None` when the metrics endpoint is disabled.
    pub registry: Option<Registry>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            metrics: Arc::clone(&self.metrics),
            registry: self.registry.clone(),
        }
    }
}

impl<S: Store + 'static> AppState<S> {
    /// Run `f` against the engine on the blocking pool and count the outcome
    /// under `route`.
    async fn run<T, F>(&self, route: &'static str, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&ClaimEngine<S>) -> Result<T, ClaimError> + Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        let result = tokio::task::spawn_blocking(move || f(&engine))
            .await
            .map_err(|e| ApiError::Internal(format!("engine task failed: {e}")))
            .and_then(|r| r.map_err(ApiError::from));
        self.metrics.observe(route, &result);
        result
    }

    fn reject<T>(&self, route: &'static str, err: ApiError) -> Result<T, ApiError> {
        let result = Err(err);
        self.metrics.observe::<T>(route, &result);
        result
    }
}

// ── Responses ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ItemPage {
    pub items: Vec<ItemView>,
    #[serde(flatten)]
    pub page: PaginationMeta,
}

#[derive(Serialize)]
pub struct ClaimList {
    pub claims: Vec<ClaimView>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub claims_removed: usize,
}

#[derive(Serialize)]
pub struct QrResponse {
    #[serde(rename = "match")]
    pub matched: bool,
}

// ── Requests ─────────────────────────────────────────────────────────────

/// Query string of `GET /items`.
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    pub status: Option<ItemStatus>,
    #[serde(rename = "type")]
    pub kind: Option<ItemType>,
    pub cursor: Option<String>,
    pub count: Option<u32>,
}

fn item_id(raw: &str) -> Result<ItemId, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId(raw.to_string()))
}

fn claim_id(raw: &str) -> Result<ClaimId, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId(raw.to_string()))
}

// ── Service ──────────────────────────────────────────────────────────────

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn metrics<S>(State(state): State<AppState<S>>) -> Result<Response, ApiError> {
    let registry = state.registry.as_ref().ok_or(ApiError::MetricsDisabled)?;
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    encoder
        .encode(&registry.gather(), &mut buf)
        .map_err(|e| ApiError::Internal(format!("failed to encode metrics: {e}")))?;
    Ok((
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buf,
    )
        .into_response())
}

// ── Items ────────────────────────────────────────────────────────────────

pub async fn report_found<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
    payload: Result<Json<FoundItemReport>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemView>), ApiError> {
    const ROUTE: &str = "report_found";
    let Json(report) = match payload {
        Ok(p) => p,
        Err(e) => return state.reject(ROUTE, e.into()),
    };
    let view = state
        .run(ROUTE, move |engine| {
            let item = engine.report_found(&caller, report)?;
            Ok(project_item(&item, &caller, None, None))
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn report_lost<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
    payload: Result<Json<LostItemReport>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemView>), ApiError> {
    const ROUTE: &str = "report_lost";
    let Json(report) = match payload {
        Ok(p) => p,
        Err(e) => return state.reject(ROUTE, e.into()),
    };
    let view = state
        .run(ROUTE, move |engine| {
            let item = engine.report_lost(&caller, report)?;
            Ok(project_item(&item, &caller, None, None))
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list_items<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
    query: Result<Query<ListItemsQuery>, QueryRejection>,
) -> Result<Json<ItemPage>, ApiError> {
    const ROUTE: &str = "list_items";
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return state.reject(ROUTE, e.into()),
    };
    let page = PaginationParams {
        cursor: query.cursor,
        count: query.count,
    };
    let offset = match page.offset() {
        Ok(offset) => offset,
        Err(e) => return state.reject(ROUTE, e),
    };
    let count = page.effective_count();
    let filter = ItemFilter {
        status: query.status,
        kind: query.kind,
    };

    let items = state
        .run(ROUTE, move |engine| {
            engine.list_items(&filter, &caller, offset as usize, count as usize)
        })
        .await?;
    let cursor = next_cursor(offset, items.len(), count);
    Ok(Json(ItemPage {
        items,
        page: PaginationMeta { cursor },
    }))
}

pub async fn my_items<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
) -> Result<Json<ItemPage>, ApiError> {
    let items = state
        .run("my_items", move |engine| engine.my_items(&caller))
        .await?;
    Ok(Json(ItemPage {
        items,
        page: PaginationMeta::default(),
    }))
}

pub async fn get_item<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ItemView>, ApiError> {
    const ROUTE: &str = "get_item";
    let id = match item_id(&id) {
        Ok(id) => id,
        Err(e) => return state.reject(ROUTE, e),
    };
    let view = state
        .run(ROUTE, move |engine| engine.item(&id, &caller))
        .await?;
    Ok(Json(view))
}

pub async fn update_item<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    payload: Result<Json<ItemPatch>, JsonRejection>,
) -> Result<Json<ItemView>, ApiError> {
    const ROUTE: &str = "update_item";
    let (id, Json(patch)) = match item_id(&id).and_then(|id| Ok((id, payload?))) {
        Ok(parsed) => parsed,
        Err(e) => return state.reject(ROUTE, e),
    };
    let view = state
        .run(ROUTE, move |engine| {
            engine.update_item(&id, &caller, patch)?;
            engine.item(&id, &caller)
        })
        .await?;
    Ok(Json(view))
}

pub async fn delete_item<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    const ROUTE: &str = "delete_item";
    let id = match item_id(&id) {
        Ok(id) => id,
        Err(e) => return state.reject(ROUTE, e),
    };
    let claims_removed = state
        .run(ROUTE, move |engine| engine.delete_item(&id, &caller))
        .await?;
    Ok(Json(DeleteResponse {
        deleted: true,
        claims_removed,
    }))
}

pub async fn verify_qr<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<QrResponse>, ApiError> {
    const ROUTE: &str = "verify_qr";
    let id = match item_id(&id) {
        Ok(id) => id,
        Err(e) => return state.reject(ROUTE, e),
    };
    let matched = state
        .run(ROUTE, move |engine| engine.verify_qr(&id, &caller))
        .await?;
    Ok(Json(QrResponse { matched }))
}

// ── Claims ───────────────────────────────────────────────────────────────

pub async fn submit_claim<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    payload: Result<Json<ClaimSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<ClaimView>), ApiError> {
    const ROUTE: &str = "submit_claim";
    let (id, Json(submission)) = match item_id(&id).and_then(|id| Ok((id, payload?))) {
        Ok(parsed) => parsed,
        Err(e) => return state.reject(ROUTE, e),
    };
    let view = state
        .run(ROUTE, move |engine| {
            let claim = engine.submit_claim(&id, &caller, submission)?;
            engine.claim(&claim.id, &caller)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list_claims<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ClaimList>, ApiError> {
    const ROUTE: &str = "list_claims";
    let id = match item_id(&id) {
        Ok(id) => id,
        Err(e) => return state.reject(ROUTE, e),
    };
    let claims = state
        .run(ROUTE, move |engine| engine.claims_for_item(&id, &caller))
        .await?;
    Ok(Json(ClaimList { claims }))
}

pub async fn my_claim<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ClaimView>, ApiError> {
    const ROUTE: &str = "my_claim";
    let id = match item_id(&id) {
        Ok(id) => id,
        Err(e) => return state.reject(ROUTE, e),
    };
    let view = state
        .run(ROUTE, move |engine| engine.my_claim(&id, &caller))
        .await?;
    Ok(Json(view))
}

pub async fn answer_claim<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    payload: Result<Json<ClaimAnswers>, JsonRejection>,
) -> Result<Json<ClaimView>, ApiError> {
    const ROUTE: &str = "answer_claim";
    let (id, Json(answers)) = match claim_id(&id).and_then(|id| Ok((id, payload?))) {
        Ok(parsed) => parsed,
        Err(e) => return state.reject(ROUTE, e),
    };
    let view = state
        .run(ROUTE, move |engine| {
            engine.answer_claim(&id, &caller, answers)?;
            engine.claim(&id, &caller)
        })
        .await?;
    Ok(Json(view))
}

pub async fn decide_claim<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    payload: Result<Json<DecisionPayload>, JsonRejection>,
) -> Result<Json<ClaimView>, ApiError> {
    const ROUTE: &str = "decide_claim";
    let (id, Json(decision)) = match claim_id(&id).and_then(|id| Ok((id, payload?))) {
        Ok(parsed) => parsed,
        Err(e) => return state.reject(ROUTE, e),
    };
    let view = state
        .run(ROUTE, move |engine| {
            engine.decide_claim(&id, &caller, &decision)?;
            engine.claim(&id, &caller)
        })
        .await?;
    Ok(Json(view))
}
