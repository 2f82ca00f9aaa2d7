use std::sync::Arc;

use crate::bitable::RecordStore;
use crate::config::Config;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RecordStore>,
}
