use application::HubHandle;
use config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub hub: HubHandle,
    pub server: ServerConfig,
}

impl AppState {
    pub fn new(hub: HubHandle, server: ServerConfig) -> Self {
        Self { hub, server }
    }
}
