use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use numwin::{Category, CategoryError, Fetcher, WindowError, WindowRegistry, WindowResponse, WindowView};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::fetcher::HttpFetcher;

/// Shared handler state: the window registry plus the upstream fetcher.
pub struct GatewayState {
    registry: WindowRegistry,
    fetcher: Arc<dyn Fetcher>,
}

impl GatewayState {
    pub fn new(registry: WindowRegistry, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { registry, fetcher }
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;
        let registry = WindowRegistry::new(config.window_capacity)?;
        let fetcher = Arc::new(HttpFetcher::from_config(config)?);
        Ok(Self::new(registry, fetcher))
    }
}

pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/numbers/:numberid", get(numbers_handler))
        .route("/windows/:numberid", get(window_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct NumberGateway;

impl NumberGateway {
    pub async fn start(config: GatewayConfig) -> Result<(), GatewayError> {
        let state = Arc::new(GatewayState::from_config(&config)?);
        let listener = TcpListener::bind(config.bind_addr.as_str())
            .await
            .map_err(GatewayError::Bind)?;
        info!(
            bind_addr = %config.bind_addr,
            window_capacity = config.window_capacity,
            fetch_timeout_ms = config.fetch_timeout_ms,
            upstream = %config.upstream.base_url,
            "Average calculator gateway listening"
        );
        Self::serve(listener, state).await
    }

    /// Serve on an already bound listener until ctrl-c.
    pub async fn serve(listener: TcpListener, state: Arc<GatewayState>) -> Result<(), GatewayError> {
        axum::serve(listener, router(state).into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(GatewayError::Serve)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install ctrl-c handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Handler failures and their HTTP mapping.
#[derive(Debug)]
enum ApiError {
    InvalidCategory(CategoryError),
    Window(WindowError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidCategory(e) => {
                warn!("Rejected request: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody {
                        error: "Invalid number type. Use p, f, e, or r.".to_string(),
                    }),
                )
                    .into_response()
            }
            ApiError::Window(e) => {
                error!("Error fetching numbers: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "Failed to fetch numbers".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(e: CategoryError) -> Self {
        ApiError::InvalidCategory(e)
    }
}

impl From<WindowError> for ApiError {
    fn from(e: WindowError) -> Self {
        ApiError::Window(e)
    }
}

async fn numbers_handler(
    State(state): State<Arc<GatewayState>>,
    Path(numberid): Path<String>,
) -> Result<Json<WindowResponse>, ApiError> {
    let category = Category::parse(&numberid)?;
    let response = state
        .registry
        .refresh(category, state.fetcher.as_ref())
        .await?;
    info!(
        category = %category,
        fetched = response.numbers.len(),
        window = response.curr_state.len(),
        avg = %response.average,
        "served window"
    );
    Ok(Json(response))
}

async fn window_handler(
    State(state): State<Arc<GatewayState>>,
    Path(numberid): Path<String>,
) -> Result<Json<WindowView>, ApiError> {
    let category = Category::parse(&numberid)?;
    Ok(Json(state.registry.inspect(category)?))
}

async fn health_handler() -> &'static str {
    "Service is healthy"
}
