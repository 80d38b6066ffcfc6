use heatgpx::{config::Config, state::AppState};
use mimalloc::MiMalloc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heatgpx=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let state = AppState::new(config.clone());

    if config.load_on_startup {
        let startup_state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = startup_state.reload_library().await {
                tracing::error!("Initial library load failed: {}", e);
            }
        });
    }

    let app = heatgpx::app(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("heatgpx listening on {}", addr);
    tracing::info!("GPX directory: {}", config.data_dir.display());
    tracing::info!("Track listing: GET http://{}/api/tracks", addr);
    tracing::info!("Library: GET http://{}/api/library", addr);

    axum::serve(listener, app).await
}
