//! One-shot key/value transaction against a fresh in-memory database.

use std::collections::BTreeMap;
use std::sync::Arc;

use arbordb::collection::Map;
use arbordb::core::{Context, Identifier};
use arbordb::kvdb::DB;
use arbordb::scalar::Str;
use arbordb::storage::{self, InMemory};
use tracing::debug;

use crate::cli::KvArgs;
use crate::output::{OutputFormat, print_pairs};

/// Run the kv command
pub fn run(args: &KvArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.db_config.load()?;
    debug!(?config, "Opening in-memory database");
    let db = DB::with_config(Arc::new(InMemory::new()), config);

    let root = apply(&db, args)?;
    match format {
        OutputFormat::Human => println!("{root}"),
        OutputFormat::Json if !args.dump => {
            println!("{}", serde_json::to_string(&serde_json::json!({ "root": root }))?);
        }
        OutputFormat::Json => {}
    }

    if args.dump {
        print_pairs(&committed_pairs(&db, &root)?, format)?;
    }
    Ok(())
}

fn apply(db: &DB, args: &KvArgs) -> arbordb::Result<Identifier> {
    let txn = db.begin()?;
    for (key, value) in &args.set {
        txn.put(key, value)?;
    }
    for key in &args.delete {
        txn.delete(key)?;
    }
    txn.commit()
}

fn committed_pairs(db: &DB, root: &Identifier) -> arbordb::Result<BTreeMap<String, String>> {
    let map =
        storage::get_as::<Map<Str, Str>>(db.storage().as_ref(), &mut Context::background(), root)?;
    Ok(map.0.iter().map(|(k, v)| (k.0.clone(), v.0.clone())).collect())
}
