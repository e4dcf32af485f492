use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{config::AuthConfig, spotify, types::AuthFlowState, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthFlowState>>>>,
    Extension(cfg): Extension<Arc<AuthConfig>>,
) -> Html<&'static str> {
    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut state = shared_state.lock().await;
    let Some(flow) = state.as_mut() else {
        return Html("<h4>No authorization flow in progress.</h4>");
    };

    // Reject callbacks that do not echo the state we sent.
    if params.get("state") != Some(&flow.state_param) {
        warning!("Callback received with unexpected state parameter.");
        return Html("<h4>State mismatch. Please restart the authorization.</h4>");
    }

    match spotify::auth::exchange_code(&cfg, code).await {
        Ok(token) => {
            flow.token = Some(token);
            Html("<h2>Authorization successful.</h2><p>Close this browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
