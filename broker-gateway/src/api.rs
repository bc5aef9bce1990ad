//! HTTP boundary over [`TradingService`].

use crate::error::GatewayError;
use crate::input;
use crate::service::TradingService;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use log::{error, info};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use trading::ItemId;

#[derive(Clone)]
pub struct AppState {
    service: Arc<TradingService>,
}

#[derive(Debug, Serialize)]
enum Status {
    Success,
}

/// Acknowledgement for mutating calls.
#[derive(Debug, Serialize)]
struct Ack {
    message: &'static str,
    status: Status,
    id: ItemId,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<i64>,
}

impl Ack {
    fn new(message: &'static str, id: ItemId) -> Self {
        Self {
            message,
            status: Status::Success,
            id,
            key: None,
            quantity: None,
        }
    }
}

/// Maps gateway failures onto a status code and `{"error": message}`.
pub struct ApiError(GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        error!("Request failed: {}", self.0);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn router(service: Arc<TradingService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/positions", get(get_positions).post(add_position))
        .route(
            "/positions/:id",
            get(get_position).put(edit_position).delete(delete_position),
        )
        .route("/orders/:id", delete(delete_order))
        .layer(CorsLayer::permissive())
        .with_state(AppState { service })
}

pub async fn serve(addr: &str, service: Arc<TradingService>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Broker Gateway listening on {}", addr);
    axum::serve(listener, router(service)).await?;
    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn get_positions(State(state): State<AppState>) -> ApiResult<Value> {
    let report = state.service.get_positions().await?;
    let failures: Vec<Value> = report
        .failures
        .iter()
        .map(|(id, err)| json!({ "id": id, "error": err.to_string() }))
        .collect();
    let positions: Vec<_> = report.positions.into_values().collect();
    Ok(Json(json!({ "positions": positions, "failures": failures })))
}

async fn get_position(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> ApiResult<trading::Position> {
    Ok(Json(state.service.get_position(id).await?))
}

async fn add_position(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Ack> {
    let item = input::parse_item(&body)?;
    let added = state.service.add_position(item).await?;
    Ok(Json(Ack {
        key: Some(added.key),
        ..Ack::new("Item is added", added.id)
    }))
}

async fn edit_position(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(body): Json<Value>,
) -> ApiResult<Ack> {
    let payload = input::parse_edit(&body)?;
    let quantity = state.service.edit_position(id, payload).await?;
    Ok(Json(Ack {
        quantity: Some(quantity),
        ..Ack::new("Item is edited", id)
    }))
}

async fn delete_position(State(state): State<AppState>, Path(id): Path<ItemId>) -> ApiResult<Ack> {
    state.service.delete_position(id).await?;
    Ok(Json(Ack::new("Item is deleted", id)))
}

async fn delete_order(State(state): State<AppState>, Path(id): Path<ItemId>) -> ApiResult<Ack> {
    state.service.delete_order(id).await?;
    Ok(Json(Ack::new("Item is deleted", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let not_found = ApiError(GatewayError::NotFound(7)).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let missing_row = ApiError(GatewayError::PositionNotFound("k".into())).into_response();
        assert_eq!(missing_row.status(), StatusCode::NOT_FOUND);

        let other = ApiError(GatewayError::SessionExpired).into_response();
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_ack_omits_unset_fields() {
        let ack = serde_json::to_value(Ack::new("Item is deleted", 3)).unwrap();
        assert_eq!(
            ack,
            json!({ "message": "Item is deleted", "status": "Success", "id": 3 })
        );
    }
}
