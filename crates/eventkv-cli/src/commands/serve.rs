//! Serve command implementation.

use eventkv_server::{Server, ServerConfig};
use eventkv_store::{JsonFileStore, KvService, WriteOptions};
use tracing::info;

pub fn run(
    data: String,
    addr: String,
    sync: bool,
    max_body: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = WriteOptions { sync, create: true };
    let store = JsonFileStore::open(&data, options)
        .map_err(|e| format!("Failed to open data file: {}: {}", data, e))?;
    info!(data = %store.path().display(), sync, "opened data file");

    let config = ServerConfig {
        addr,
        max_body_bytes: max_body,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let server = Server::bind(&config, KvService::new(store))
            .await
            .map_err(|e| format!("Failed to bind {}: {}", config.addr, e))?;
        server
            .run_until(async {
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            })
            .await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
