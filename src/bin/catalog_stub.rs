// Standalone fake catalog for trying kbprobe without the real site
//
//   cargo run --features catalog-stub --bin catalog-stub -- 3000
//   kbprobe 5001716 --catalog-url http://127.0.0.1:3000/

use std::net::SocketAddr;
use tracing::{Level, info};

include!("../../tests/common/catalog_app.rs");

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let app = create_app().await;

    let port: u16 = std::env::args()
        .nth(1)
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");

    info!("Fake catalog listening on http://{}", addr);
    for update in STUB_UPDATES {
        info!("  KB{} -> {}", update.kb, update.title);
    }
    info!("  {} -> truncated results table", STUB_BROKEN_KB);

    axum::serve(listener, app).await.expect("Server failed");
}
