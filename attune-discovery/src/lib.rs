use std::sync::Arc;

pub mod config;
pub mod events;
pub mod matching;
pub mod models;
pub mod routes;
pub mod schema;
pub mod store;

use attune_shared::clients::rabbitmq::RabbitMQClient;

use config::AppConfig;
use matching::quota::QuotaManager;
use matching::swipe::SwipeService;
use store::{ProfileStore, SwipeStore};

pub struct AppState {
    pub config: AppConfig,
    pub profiles: Arc<dyn ProfileStore>,
    pub swipes: Arc<dyn SwipeStore>,
    pub swipe_service: SwipeService,
    pub quota: QuotaManager,
    /// Absent when the broker is unreachable; the service still runs, events
    /// are just not emitted.
    pub rabbitmq: Option<RabbitMQClient>,
}
