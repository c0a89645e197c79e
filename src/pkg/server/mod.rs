pub mod extract;
pub mod handlers;
pub mod middlewares;
pub mod router;
pub mod state;

use axum::http::{HeaderValue, Method, header};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{conf::settings, prelude::Result};
use router::build_routes;

fn cors() -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);
    match settings.cors_allow_origin.as_str() {
        "*" => layer.allow_origin(Any),
        origin => match HeaderValue::from_str(origin) {
            Ok(origin) => layer.allow_origin(origin),
            Err(_) => {
                tracing::warn!("invalid CORS_ALLOW_ORIGIN {:?}, allowing any origin", origin);
                layer.allow_origin(Any)
            }
        },
    }
}

pub async fn listen() -> Result<()> {
    let app = build_routes()
        .await?
        .nest_service("/uploads", ServeDir::new(&settings.upload_dir))
        .layer(cors())
        .layer(TraceLayer::new_for_http());
    let listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", settings.listen_port.clone())).await?;
    tracing::info!("Listening at port {}", settings.listen_port);
    tokio::select! {
        r = axum::serve(listener, app) => {
            tracing::warn!("server ended unexpectedly: {:?}", &r)
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received ctrl+c interrupt, closing server");
        }
    }
    Ok(())
}
