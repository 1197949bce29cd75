use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_config::IpFilter;
use std::net::SocketAddr;

/// Rejects peers outside the allow-list with `403`.
///
/// Requests without connection info (unix sockets) pass.
pub async fn ip_filter_middleware(
    State(filter): State<IpFilter>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    match peer {
        Some(ip) if !filter.is_allowed(ip) => {
            tracing::debug!(peer = %ip, "health request rejected by ip filter");
            observability::HealthMetrics::record_denied(request.uri().path());
            StatusCode::FORBIDDEN.into_response()
        }
        _ => next.run(request).await,
    }
}
