use crate::{Config, Database};

/// Shared request state. The database handle is injected by the caller, so
/// every server (and every test) owns its own store.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Database,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Self {
        Self { config, db }
    }
}
