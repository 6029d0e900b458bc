// HTTP surface: routing, handlers, and error mapping
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};
use tracing::{error, info};

use crate::booking::{BookingConfirmation, BookingError, BookingRequest};
use crate::dataset::{Flight, Route};
use crate::search::{ConnectionMatch, ConnectionQuery, DirectQuery};
use crate::store::FlightStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

// Error types for the HTTP surface. Every error renders as a JSON body of
// the shape {"error": "..."} with the matching status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Route not found")]
    RouteNotFound,

    #[error("No direct flights available")]
    NoDirectFlights,

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("Invalid request body: {0}")]
    MalformedBody(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::RouteNotFound | ApiError::NoDirectFlights => StatusCode::NOT_FOUND,
            ApiError::Booking(BookingError::FlightNotFound) => StatusCode::NOT_FOUND,
            ApiError::Booking(BookingError::InsufficientCapacity) => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// Optional ?departureTime=...&arrivalTime=... hints shared by both search
// endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeHints {
    departure_time: Option<String>,
    arrival_time: Option<String>,
}

pub fn router(store: Arc<FlightStore>) -> Router {
    Router::new()
        .route("/routes", get(list_routes))
        .route("/routes/:route_id", get(show_route))
        .route("/direct-flights/:departure/:arrival", get(direct_flights))
        .route(
            "/connection-flights/:departure/:arrival",
            get(connection_flights),
        )
        .route("/book", post(book))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

pub async fn serve(config: &Config, store: Arc<FlightStore>) -> Result<(), Error> {
    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|cause| Error::IO {
            message: "Failed to listen on port".to_string(),
            cause,
        })?;
    info!(
        "listening on {:?}",
        listener.local_addr().expect("local_addr never fails")
    );
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|cause| Error::IO {
            message: "Server terminated abnormally".to_string(),
            cause,
        })
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {message}: {cause}")]
    IO {
        message: String,
        cause: std::io::Error,
    },
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to install ctrl-c handler: {e}");
        return;
    }
    info!("starting graceful shutdown...");
}

async fn list_routes(State(store): State<Arc<FlightStore>>) -> Json<Vec<Route>> {
    Json(store.routes())
}

async fn show_route(
    State(store): State<Arc<FlightStore>>,
    Path(route_id): Path<String>,
) -> Result<Json<Route>, ApiError> {
    store
        .route(&route_id)
        .map(Json)
        .ok_or(ApiError::RouteNotFound)
}

// An empty direct-flight result is a 404, unlike connection search.
async fn direct_flights(
    State(store): State<Arc<FlightStore>>,
    Path((departure, arrival)): Path<(String, String)>,
    Query(hints): Query<TimeHints>,
) -> Result<Json<Vec<Flight>>, ApiError> {
    let query = DirectQuery {
        departure,
        arrival,
        departure_time: hints.departure_time,
        arrival_time: hints.arrival_time,
    };
    let flights = store.find_direct(&query);
    if flights.is_empty() {
        return Err(ApiError::NoDirectFlights);
    }
    Ok(Json(flights))
}

async fn connection_flights(
    State(store): State<Arc<FlightStore>>,
    Path((departure, arrival)): Path<(String, String)>,
    Query(hints): Query<TimeHints>,
) -> Json<Vec<ConnectionMatch>> {
    let query = ConnectionQuery {
        departure,
        arrival,
        departure_time: hints.departure_time,
        arrival_time: hints.arrival_time,
    };
    Json(store.find_connections(&query))
}

async fn book(
    State(store): State<Arc<FlightStore>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingConfirmation>, ApiError> {
    // A missing or wrong-typed body is an explicit 400, not a panic.
    let Json(request) = payload.map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;
    let confirmation = store.book(&request)?;
    Ok(Json(confirmation))
}
