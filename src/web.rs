use crate::{
    app::{AppError, AppService},
    semantic::{limit_from_signed, SearchOutcome},
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;

#[derive(Clone)]
struct SharedState {
    app: Arc<AppService>,
}

pub fn router(app: Arc<AppService>) -> Router {
    let shared_state = Arc::new(SharedState { app });

    Router::new()
        .route("/api/search", post(search))
        .route("/api/professionals/total", get(total))
        .route("/api/config", get(get_config))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

async fn start_app(app: AppService, listen: SocketAddr) -> anyhow::Result<()> {
    async fn shutdown_signal() {
        let ctrl_c = async {
            if let Err(err) = signal::ctrl_c().await {
                log::error!("failed to install Ctrl+C handler: {err}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(err) => {
                    log::error!("failed to install signal handler: {err}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        log::warn!("shutting down");
    }

    let app = router(Arc::new(app));

    let listener = tokio::net::TcpListener::bind(listen).await?;
    log::info!("listening on {listen}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn start_daemon(app: AppService, listen: SocketAddr) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { start_app(app, listen).await })
}

#[derive(Debug)]
struct HttpError(AppError);

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        let status = if self.0.is_client_error() {
            axum::http::StatusCode::BAD_REQUEST
        } else {
            log::error!("{self:?}");
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, Json(json!({"error": self.0.to_string()}))).into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: String,

    /// Minimum similarity; the configured default when absent
    pub threshold: Option<f32>,

    /// Maximum results; the configured default when absent.
    /// Signed so a negative value is reported instead of failing to parse.
    pub limit: Option<i64>,
}

async fn search(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchOutcome>, HttpError> {
    log::debug!("payload: {payload:?}");

    let limit = payload.limit.map(limit_from_signed).transpose()?;
    let app = state.app.clone();

    tokio::task::block_in_place(move || {
        app.search(&payload.query, payload.threshold, limit)
            .map(Json)
            .map_err(Into::into)
    })
}

#[derive(Serialize)]
struct TotalResponse {
    total: usize,
}

async fn total(State(state): State<Arc<SharedState>>) -> Json<TotalResponse> {
    Json(TotalResponse {
        total: state.app.total(),
    })
}

async fn get_config(State(state): State<Arc<SharedState>>) -> impl IntoResponse {
    let config = state.app.config();
    Json(json!({
        "model": state.app.model_name(),
        "threshold": config.search.threshold,
        "max_results": config.search.max_results,
    }))
}
