use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{
    Res,
    api::{self, ApiState, rate_limit::limit_uploads},
    info,
};

/// Builds the API router. Only `/artists` is rate limited.
///
/// The limiter keys on the peer address; serve the router with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn make_app(state: Arc<ApiState>) -> Res<Router> {
    let routes = Router::new().route("/artists", post(api::collect));
    let uploads = limit_uploads(routes, state.limits)?;

    Ok(Router::new()
        .route("/health", get(api::health))
        .merge(uploads)
        .layer(Extension(state)))
}

pub async fn start_api_server(address: &str, state: Arc<ApiState>) -> Res<()> {
    let addr = SocketAddr::from_str(address)?;
    let app = make_app(state)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
