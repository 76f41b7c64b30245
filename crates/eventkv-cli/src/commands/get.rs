//! Get command implementation.

use crate::commands::open_existing;
use eventkv_store::ReadOutcome;

pub fn run(data: String, key: String) -> Result<(), Box<dyn std::error::Error>> {
    let service = open_existing(&data)?;

    match service.read(&key)? {
        ReadOutcome::Live(value) => {
            println!("{}", value);
            Ok(())
        }
        ReadOutcome::Deleted => Err(format!("Key has been deleted: {}", key).into()),
    }
}
