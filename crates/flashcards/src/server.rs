//! HTTP front end: the card page and the mutation endpoint.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::{from_fn, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{error, info, warn, Instrument};

use crate::card::{Deck, FlashcardRecord};
use crate::config::Config;
use crate::error::Error;
use crate::loader::load_deck;
use crate::mutation::{CardMutator, TableMutator, PAGES_ENDPOINT};
use crate::notion::TableClient;
use crate::render::{render_error_page, render_page};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    client: Arc<dyn TableClient>,
    config: Arc<Config>,
}

impl AppState {
    /// Bundle a table client with the configuration it is used under.
    #[must_use]
    pub fn new(client: Arc<dyn TableClient>, config: Config) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// The configuration the server was started with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/healthz", get(healthz_handler))
        .route(PAGES_ENDPOINT, post(update_pages_handler))
        .layer(from_fn(request_tracing_middleware))
        .with_state(state)
}

/// Serve the application on `listener` until the process is stopped.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, state: AppState) -> crate::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("listening on http://{addr}");
    }
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

async fn request_tracing_middleware(request: Request<Body>, next: Next) -> Response {
    let span = tracing::info_span!(
        "http.request",
        method = %request.method(),
        route = %request.uri().path(),
    );
    async move {
        let response = next.run(request).await;
        info!(status = response.status().as_u16(), "request finished");
        response
    }
    .instrument(span)
    .await
}

async fn index_handler(State(state): State<AppState>) -> Response {
    let database_id = state.config.notion.database_id.as_deref();
    let rendered = load_deck(state.client.as_ref(), database_id)
        .await
        .and_then(|deck| render_page(&deck));
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("page render failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error_page(&e.to_string())),
            )
                .into_response()
        }
    }
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn update_pages_handler(
    State(state): State<AppState>,
    Json(records): Json<Vec<FlashcardRecord>>,
) -> Response {
    let deck = match Deck::new(records) {
        Ok(deck) => deck,
        Err(e) => return ApiError(e).into_response(),
    };
    let mutator = TableMutator::new(Arc::clone(&state.client));
    match mutator.persist(&deck.to_records()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            warn!("mutation failed: {e}");
            ApiError(e).into_response()
        }
    }
}

/// JSON error body for the mutation endpoint.
struct ApiError(Error);

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::DuplicateCard { .. } | Error::UnknownCard { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            e if e.is_remote_error() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}
