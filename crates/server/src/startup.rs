use std::{future::Future, net::SocketAddr, sync::Arc};

use configs::AppConfig;
use service::movies::{InMemoryMovieStore, MovieRepository, MovieService};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::errors::StartupError;
use crate::observability;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Initial store contents: seed file, built-in catalogue, or nothing.
async fn build_store(cfg: &AppConfig) -> Result<InMemoryMovieStore, StartupError> {
    let store = match (&cfg.store.seed_file, cfg.store.seed) {
        (Some(path), _) => {
            info!(%path, "seeding movies from file");
            InMemoryMovieStore::from_seed_file(path).await?
        }
        (None, true) => InMemoryMovieStore::seeded(),
        (None, false) => InMemoryMovieStore::new(),
    };
    Ok(store)
}

pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let store = build_store(cfg).await?;
    let repo: Arc<dyn MovieRepository> = Arc::new(store);
    let movies = MovieService::new(repo, cfg.validation.patch_mode);
    observability::set_movie_count(movies.count().await);
    info!(
        movies = movies.count().await,
        patch_mode = ?cfg.validation.patch_mode,
        "movie store ready"
    );
    Ok(AppState { movies })
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    cfg.server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("{}: {e}", cfg.server.bind_addr())))
}

/// Resolve once `signal` fires. If the listener itself fails, log it and
/// never resolve so the server keeps running instead of draining at once.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!(event = "shutdown_signal", "shutdown signal received, draining connections"),
        Err(e) => {
            error!(event = "signal_listen_failed", error = %e, "cannot listen for shutdown signal; graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}

pub async fn ctrl_c_shutdown() {
    shutdown_on(tokio::signal::ctrl_c()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = routes::build_router(state, build_cors());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Public entry: build the store and run the HTTP server.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "starting movie api");
    serve(listener, state, shutdown).await
}
