use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use attune_discovery::config::{AppConfig, StorageBackend};
use attune_discovery::matching::quota::QuotaManager;
use attune_discovery::matching::swipe::SwipeService;
use attune_discovery::store::memory::MemoryStore;
use attune_discovery::store::postgres::PgStore;
use attune_discovery::store::redis_quota::RedisQuotaStore;
use attune_discovery::store::{ProfileStore, QuotaStore, SwipeStore};
use attune_discovery::{events, routes, AppState};

use attune_shared::clients::db::create_pool;
use attune_shared::clients::rabbitmq::RabbitMQClient;
use attune_shared::clients::redis::RedisClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    attune_shared::middleware::init_tracing("attune-discovery");

    let config = AppConfig::load()?;
    let port = config.port;
    let metrics_handle = attune_shared::middleware::init_metrics();

    let (profiles, swipes, quotas): (
        Arc<dyn ProfileStore>,
        Arc<dyn SwipeStore>,
        Arc<dyn QuotaStore>,
    ) = match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url);
            let redis = RedisClient::connect(&config.redis_url).await?;
            let pg = Arc::new(PgStore::new(pool));
            (pg.clone(), pg, Arc::new(RedisQuotaStore::new(redis)))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, state will not survive a restart");
            let mem = Arc::new(MemoryStore::new());
            (mem.clone(), mem.clone(), mem)
        }
    };

    let rabbitmq = match RabbitMQClient::connect(&config.rabbitmq_url).await {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!(error = %e, "RabbitMQ unavailable, events disabled");
            None
        }
    };

    let quota = QuotaManager::new(quotas, config.quota_limits());
    let swipe_service = SwipeService::new(profiles.clone(), swipes.clone(), quota.clone());

    let state = Arc::new(AppState {
        config,
        profiles,
        swipes,
        swipe_service,
        quota,
        rabbitmq,
    });

    // Spawn the assessment-completed subscriber when the broker is up
    if state.rabbitmq.is_some() {
        let sub_state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = events::subscriber::listen_assessment_completed(sub_state).await {
                tracing::error!(error = %e, "assessment.completed subscriber failed");
            }
        });
    }

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/me/profile",
            get(routes::profile::get_profile).put(routes::profile::upsert_profile),
        )
        .route("/feed", get(routes::feed::get_feed))
        .route("/swipes", post(routes::swipes::record_swipe))
        .route("/quota", get(routes::quota::get_quota))
        .route("/matches", get(routes::matches::list_matches))
        .route(
            "/compatibility/:target_id",
            get(routes::compatibility::get_compatibility),
        )
        .route(
            "/metrics",
            get(move || std::future::ready(metrics_handle.render())),
        )
        .layer(axum::middleware::from_fn(
            attune_shared::middleware::metrics_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "attune-discovery starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
