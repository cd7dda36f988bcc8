use courtside::{
    config::Config,
    event::EventBus,
    notify::EventBusNotifier,
    persistence::{InMemoryScoreRepository, PostgresScoreRepository, ScoreRepository},
    session::{self, MatchService},
    shared::AppState,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courtside=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting courtside scoring server");
    let config = Config::load();

    let repository: Arc<dyn ScoreRepository> = match &config.database_url {
        Some(url) => match sqlx::PgPool::connect(url).await {
            Ok(pool) => {
                info!("Connected to database");
                Arc::new(PostgresScoreRepository::new(pool))
            }
            Err(e) => {
                error!(error = %e, "Failed to connect to database");
                return;
            }
        },
        None => {
            info!("DATABASE_URL not set, keeping scores in memory");
            Arc::new(InMemoryScoreRepository::new())
        }
    };

    let event_bus = EventBus::new(100);
    let notifier = Arc::new(EventBusNotifier::new(event_bus.clone()));
    let match_service = Arc::new(MatchService::new(
        repository,
        notifier,
        event_bus,
        config.finalize_settings(),
    ));
    let app_state = AppState::new(match_service, config.default_match_config());

    let app = session::router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, address = %address, "Failed to bind");
            return;
        }
    };
    info!("Server running on http://{}", address);
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server stopped");
    }
}
