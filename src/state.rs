use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::format::Clock;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub clock: Clock,
}
