//! Identifier of a JSON document.

use std::fs;
use std::io::{self, Read};

use arbordb::core::{Context, Identifier, canonical_id};
use arbordb::dshash;
use serde_json::Value;

use crate::cli::HashArgs;
use crate::output::OutputFormat;

/// Run the hash command
pub fn run(args: &HashArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let text = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.input)?
    };
    let document: Value = serde_json::from_str(&text)?;
    let id = identify(&document, args.canonical)?;

    match format {
        OutputFormat::Human => println!("{id}"),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "identifier": id,
                "kind": id.kind(),
                "key": id.key(),
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}

fn identify(document: &Value, canonical: bool) -> arbordb::Result<Identifier> {
    if canonical {
        let mut ctx = Context::background();
        canonical_id(&mut ctx, document)
    } else {
        dshash::identifier(document)
    }
}
