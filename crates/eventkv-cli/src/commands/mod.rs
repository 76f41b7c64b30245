pub mod get;
pub mod history;
pub mod list;
pub mod serve;

use eventkv_store::{JsonFileStore, KvService, WriteOptions};

/// Opens an existing data file for offline reads.
pub fn open_existing(data: &str) -> Result<KvService<JsonFileStore>, Box<dyn std::error::Error>> {
    let options = WriteOptions {
        sync: false,
        create: false,
    };
    let store = JsonFileStore::open(data, options)
        .map_err(|e| format!("Failed to open data file: {}: {}", data, e))?;
    Ok(KvService::new(store))
}
