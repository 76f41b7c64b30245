//! List command implementation.

use crate::commands::open_existing;
use crate::output;
use eventkv_store::DocumentStore;

pub fn run(data: String, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let service = open_existing(&data)?;
    let doc = service.store().load()?;

    if !json {
        output::print_table_header();
    }

    for (key, record) in doc.iter() {
        let state = doc.state(key)?;
        if json {
            println!("{}", serde_json::to_string(&output::key_summary(key, record, state))?);
        } else {
            println!("{}", output::format_table_row(key, record, state));
        }
    }

    Ok(())
}
