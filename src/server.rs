use crate::error::RelayError;
use crate::relay::Relay;
use crate::upstreams::articles::ArticleQuery;
use crate::upstreams::geolocation::ServerInfo;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        let status =
            StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: self.status.as_u16(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn router(relay: Arc<dyn Relay>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/binancedata", get(binance_data))
        .route("/serverinfo", get(server_info))
        .with_state(relay)
}

/// Serves until the listener fails.
pub async fn serve(listener: TcpListener, relay: Arc<dyn Relay>) -> std::io::Result<()> {
    axum::serve(listener, router(relay)).await
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "relayrs is running" }))
}

async fn binance_data(
    State(relay): State<Arc<dyn Relay>>,
    query: Result<Query<ArticleQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        debug!("rejected article query: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    match relay.articles(query).await {
        Ok(body) => Ok(Json(body)),
        Err(e) => {
            warn!("/binancedata failed: {}", e);
            Err(e.into())
        }
    }
}

async fn server_info(State(relay): State<Arc<dyn Relay>>) -> Result<Json<ServerInfo>, ApiError> {
    match relay.server_info().await {
        Ok(info) => Ok(Json(info)),
        Err(e) => {
            warn!("/serverinfo failed: {}", e);
            Err(e.into())
        }
    }
}
