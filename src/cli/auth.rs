use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config::AuthConfig, error, spotify, types::AuthFlowState};

pub async fn auth() {
    let cfg = match AuthConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => error!("{}", e),
    };

    let shared_state: Arc<Mutex<Option<AuthFlowState>>> = Arc::new(Mutex::new(None));
    spotify::auth::auth(cfg, shared_state).await;
}
