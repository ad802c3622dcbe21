use std::sync::Arc;

use crate::api_client::CareerApi;
use crate::config::Config;
use crate::notice::Notifier;
use crate::session::SessionStore;

/// Shared application state handed to every workflow (wizard, tracker,
/// roadmaps, learn). Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CareerApi>,
    pub session: Arc<SessionStore>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Config,
}
