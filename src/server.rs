use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, MemoryStore, PgProgrammerStore, ProgrammerStore};
use crate::handlers::{programmers, service};
use crate::middleware::identify_user_middleware;
use crate::services::programmer::ValidationRules;
use crate::services::ProgrammerService;

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProgrammerStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProgrammerStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Connect the configured store: PostgreSQL when a URL is set, memory otherwise
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn ProgrammerStore> = match config.database.url {
            Some(_) => {
                let pool = DatabaseManager::connect(&config.database)
                    .await
                    .context("failed to connect to database")?;
                let store = PgProgrammerStore::new(pool);
                store.ensure_schema().await.context("failed to prepare schema")?;
                Arc::new(store)
            }
            None => {
                info!("DATABASE_URL not set, keeping programmers in memory");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::new(store, config))
    }

    pub fn programmers(&self) -> ProgrammerService {
        ProgrammerService::new(
            self.store.clone(),
            ValidationRules::from(&self.config.validation),
        )
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(service::root))
        .route("/health", get(service::health))
        .merge(programmer_routes())
        .nest("/api", programmer_routes())
        .layer(from_fn_with_state(state.clone(), identify_user_middleware))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if state.config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn programmer_routes() -> Router<AppState> {
    let item_path = format!("{}/:nickname", programmers::PROGRAMMERS_PATH);

    Router::new()
        .route(
            programmers::PROGRAMMERS_PATH,
            get(programmers::list).post(programmers::create),
        )
        .route(
            &item_path,
            get(programmers::show)
                .put(programmers::replace)
                .patch(programmers::patch)
                .delete(programmers::delete),
        )
}

/// Bind and serve until the process is stopped
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    info!("Starting Code Battle API in {:?} mode", config.environment);

    let state = AppState::from_config(config).await?;
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Code Battle API listening on http://{}", bind_addr);
    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
