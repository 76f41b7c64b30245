//! History command implementation.

use crate::commands::open_existing;
use crate::output;

pub fn run(data: String, key: String, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let service = open_existing(&data)?;
    let events = service.history(&key)?;

    if json {
        println!("{}", serde_json::to_string(&events)?);
        return Ok(());
    }

    for (index, event) in events.iter().enumerate() {
        println!("{}", output::format_event_row(index, event));
    }
    Ok(())
}
