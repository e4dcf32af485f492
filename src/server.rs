use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config::AuthConfig, error, types::AuthFlowState};

pub async fn start_api_server(cfg: AuthConfig, state: Arc<Mutex<Option<AuthFlowState>>>) {
    let addr = match SocketAddr::from_str(&cfg.server_address) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let app = Router::new()
        .route("/health", get(api::health))
        .route(
            "/callback",
            get(api::callback)
                .layer::<_, std::convert::Infallible>(Extension(state))
                .layer(Extension(Arc::new(cfg))),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
