use rosterly_config::{CorsConfig, ImportConfig};
use rosterly_db::{PgPool, PgRosterStore, RosterBackend};

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: RosterBackend,
    pub cors_config: CorsConfig,
    pub import_config: ImportConfig,
}

impl AppState {
    pub fn new(store: impl Into<RosterBackend>, cors_config: CorsConfig, import_config: ImportConfig) -> Self {
        Self {
            store: store.into(),
            cors_config,
            import_config,
        }
    }
}

/// State backed by PostgreSQL, with configuration read from the environment.
pub fn init_app_state(pool: PgPool) -> AppState {
    AppState::new(
        PgRosterStore::new(pool),
        CorsConfig::from_env(),
        ImportConfig::from_env(),
    )
}
