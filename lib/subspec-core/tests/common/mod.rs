use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;
use axum::Router;
use subspec_core::Document;
use tokio::net::TcpListener;
use tracing::info;
use url::Url;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn deployments_source() -> Document {
    let path = fixture_path("deployments-swagger.json");
    match Document::load(&path) {
        Ok(document) => document,
        Err(error) => panic!("fail to load {}: {error}", path.display()),
    }
}

/// Serves `router` on a random local port and returns the conversion endpoint URL.
pub async fn start_converter(router: Router) -> anyhow::Result<Url> {
    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
        .await
        .context("binding stub converter")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router).await {
            panic!("stub converter stopped: {error}");
        }
    });

    info!(%addr, "stub converter started");
    let url = Url::parse(&format!("http://{addr}/api/convert"))?;
    Ok(url)
}
