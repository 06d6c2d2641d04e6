//! Web server setup and routing

use anyhow::{bail, Context, Result};
use axum_server::tls_rustls::RustlsConfig;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::api;
use crate::config::TlsConfig;
use crate::state::AppState;

/// Build the router: health endpoints, assets under the configured mount,
/// and the web frontend as fallback
pub fn router(state: Arc<AppState>) -> Router {
    let asset_route = format!("{}/{{*path}}", state.config.assets.mount_path());

    Router::new()
        .route("/ping", get(api::ping))
        .route("/echo", post(api::echo))
        .route(&asset_route, get(api::serve_asset))
        // Host page and wasm bundle
        .fallback_service(ServeDir::new(&state.config.web.path))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve on `bind`, over TLS when a certificate pair is configured
pub async fn run(state: Arc<AppState>, bind: &str, tls: Option<&TlsConfig>) -> Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", bind))?;
    let scheme = if tls.is_some() { "https" } else { "http" };
    log_reachable_addresses(addr, scheme, &state.config.assets.mount_path());

    let app = router(state);
    match tls {
        Some(tls) => serve_tls(app, addr, tls).await,
        None => serve_plain(app, addr).await,
    }
}

async fn serve_plain(app: Router, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Serving over HTTP");
    axum::serve(listener, app).await.context("HTTP server stopped")
}

async fn serve_tls(app: Router, addr: SocketAddr, tls: &TlsConfig) -> Result<()> {
    for file in [&tls.cert, &tls.key] {
        if !Path::new(file).is_file() {
            bail!("TLS file not found: {}", file);
        }
    }
    let rustls = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
        .await
        .context("Failed to load TLS certificate")?;

    info!(%addr, cert = %tls.cert, "Serving over HTTPS");
    axum_server::bind_rustls(addr, rustls)
        .serve(app.into_make_service())
        .await
        .context("HTTPS server stopped")
}

/// Log where the assets can be fetched from. A wildcard bind is expanded
/// to the LAN addresses of this host.
fn log_reachable_addresses(addr: SocketAddr, scheme: &str, mount: &str) {
    if !addr.ip().is_unspecified() {
        info!(url = %format!("{}://{}{}/", scheme, addr, mount), "Assets available");
        return;
    }

    for ip in lan_ipv4_addresses() {
        info!(url = %format!("{}://{}:{}{}/", scheme, ip, addr.port(), mount), "Assets available");
    }
}

fn lan_ipv4_addresses() -> Vec<Ipv4Addr> {
    use network_interface::{NetworkInterface, NetworkInterfaceConfig};

    let mut ips = Vec::new();
    if let Ok(interfaces) = NetworkInterface::show() {
        for iface in interfaces {
            if iface.name.starts_with("docker")
                || iface.name.starts_with("br-")
                || iface.name.starts_with("veth")
            {
                continue;
            }
            for addr in iface.addr {
                if let network_interface::Addr::V4(v4) = addr {
                    if !v4.ip.is_loopback() {
                        ips.push(v4.ip);
                    }
                }
            }
        }
    }
    ips
}
