//! HTTP surface:
//! - GET  /                  - estimation form
//! - POST /predict           - estimate from form-encoded fields
//! - GET  /details/{feature} - feature description page

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::core::catalog::FeatureCatalog;
use crate::core::estimator::EstimatorService;
use crate::domain::ports::Regressor;
use crate::utils::error::RequestError;
use crate::web::render;

/// Shared, read-only state handed to every handler.
pub struct AppState<R: Regressor> {
    pub estimator: EstimatorService<R>,
    pub catalog: FeatureCatalog,
}

impl<R: Regressor> AppState<R> {
    pub fn new(estimator: EstimatorService<R>, catalog: FeatureCatalog) -> Self {
        Self { estimator, catalog }
    }
}

pub fn create_router<R: Regressor + 'static>(state: Arc<AppState<R>>) -> Router {
    Router::new()
        .route("/", get(handle_form))
        .route("/predict", post(handle_predict::<R>))
        .route("/details/{feature}", get(handle_details::<R>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves until the listener fails or Ctrl-C is received.
pub async fn run_server<R: Regressor + 'static>(
    listener: tokio::net::TcpListener,
    state: Arc<AppState<R>>,
) -> std::io::Result<()> {
    let router = create_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}

async fn handle_form() -> Html<String> {
    Html(render::render_form())
}

async fn handle_predict<R: Regressor + 'static>(
    State(state): State<Arc<AppState<R>>>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response {
    let result = match form {
        Ok(Form(fields)) => state.estimator.estimate_form(&fields),
        Err(rejection) => Err(RequestError::parse("form", rejection.body_text())),
    };

    match result {
        Ok(estimate) => {
            tracing::info!("💰 Estimated cost {:.2}", estimate.predicted_cost);
            Html(render::render_estimate(&estimate)).into_response()
        }
        Err(error) => error_response(&error),
    }
}

fn error_response(error: &RequestError) -> Response {
    let status = if error.is_client_error() {
        tracing::info!("Rejected prediction request: {}", error);
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!("❌ Prediction failed: {}", error);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Html(render::render_error(error))).into_response()
}

async fn handle_details<R: Regressor + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(feature): Path<String>,
) -> Html<String> {
    let detail = state.catalog.get(&feature);
    if detail.is_none() {
        tracing::debug!("No details for '{}'", feature);
    }
    Html(render::render_details(&feature, detail))
}
