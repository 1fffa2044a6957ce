use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use server_api::{get_activity, list_activities, signup, unregister, ApiContext};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{ActivityListing, ActivitySummary, MessageResponse, SignupQuery, UnregisterQuery},
};
use storage::RosterStore;
use tower_http::services::ServeDir;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_seed, load_settings};

type ApiFailure = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = load_settings();
    let seeds = load_seed(&settings).map_err(|error| {
        error!(
            seed_file = ?settings.seed_file,
            error = %format!("{error:#}"),
            "failed to load activity seed; check the seed file path and toml syntax"
        );
        error
    })?;
    let roster = RosterStore::from_seed(seeds).context("invalid activity seed")?;
    info!(activities = roster.len().await, "activity roster seeded");

    let state = AppState {
        api: ApiContext { roster },
        static_dir: settings.static_dir.clone(),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, static_dir = %settings.static_dir.display(), "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/activities", get(http_list_activities))
        .route("/activities/:activity_name", get(http_get_activity))
        .route("/activities/:activity_name/signup", post(http_signup))
        .route("/activities/:activity_name/unregister", post(http_unregister))
        .nest_service("/static", static_files)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

async fn index() -> Redirect {
    Redirect::temporary("/static/index.html")
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_activities(State(state): State<Arc<AppState>>) -> Json<ActivityListing> {
    Json(list_activities(&state.api).await)
}

async fn http_get_activity(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
) -> Result<Json<ActivitySummary>, ApiFailure> {
    let activity = get_activity(&state.api, &activity_name)
        .await
        .map_err(api_failure)?;
    Ok(Json(activity))
}

async fn http_signup(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    query: Result<Query<SignupQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiFailure> {
    let Query(q) = query.map_err(query_failure)?;
    let response = signup(&state.api, &activity_name, &q.email, q.name.as_deref())
        .await
        .map_err(api_failure)?;
    Ok(Json(response))
}

async fn http_unregister(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    query: Result<Query<UnregisterQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiFailure> {
    let Query(q) = query.map_err(query_failure)?;
    let response = unregister(&state.api, &activity_name, &q.email)
        .await
        .map_err(api_failure)?;
    Ok(Json(response))
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
    }
}

fn api_failure(err: ApiError) -> ApiFailure {
    (status_for(err.code), Json(err))
}

fn query_failure(rejection: QueryRejection) -> ApiFailure {
    api_failure(ApiError::new(ErrorCode::Validation, rejection.body_text()))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
