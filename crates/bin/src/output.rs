//! Output formatting helpers for human-readable and JSON output.

use std::collections::BTreeMap;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Print key/value pairs, sorted by key.
///
/// Human output aligns values in a second column; JSON output is a single
/// object.
pub fn print_pairs(
    pairs: &BTreeMap<String, String>,
    format: OutputFormat,
) -> serde_json::Result<()> {
    match format {
        OutputFormat::Human => {
            let width = pairs.keys().map(String::len).max().unwrap_or(0);
            for (key, value) in pairs {
                println!("{key:<width$}  {value}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(pairs)?),
    }
    Ok(())
}
