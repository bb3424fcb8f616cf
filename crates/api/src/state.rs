use std::sync::Arc;

use roster_core::grid::StateCodec;
use roster_db::DbPool;

use crate::config::ServerConfig;

/// Everything a handler reaches through `State<AppState>`. Clones share the
/// pool, configuration and grid cookie codec.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
    pub codec: Arc<StateCodec>,
}

impl AppState {
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        let codec = Arc::new(StateCodec::new(config.grid.session_secret_key.clone()));
        Self {
            pool,
            config: Arc::new(config),
            codec,
        }
    }
}
