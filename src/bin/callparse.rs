//! Resolves call signs from the command line and prints hits as JSON lines.

use std::error::Error;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use callparser::{
    engine::LookupEngine,
    load::load_index,
    persist::{HitCache, SqliteHitCache},
    runtime::handle::{spawn_lookup_service, RuntimeConfig},
};

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "callparse", about = "Resolves call signs to DXCC entities")]
struct Args {
    /// PrefixList XML or JSON entity database.
    #[clap(short = 'p', long)]
    prefix_file: PathBuf,

    /// SQLite hit cache.
    #[clap(short = 'c', long)]
    cache: Option<PathBuf>,

    /// File with one call sign per line, looked up as a batch.
    #[clap(short = 'b', long)]
    batch: Option<PathBuf>,

    /// Cap on batch hits; 0 keeps everything.
    #[clap(long, default_value = "2000")]
    max_batch_hits: usize,

    /// Call signs to look up one by one.
    calls: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("callparser=info"),
    )
    .init();

    let args = Args::parse();
    let engine = LookupEngine::new(load_index(&args.prefix_file)?);
    let cache = match &args.cache {
        Some(path) => Some(Box::new(SqliteHitCache::open(path)?) as Box<dyn HitCache>),
        None => None,
    };
    let config = RuntimeConfig {
        max_batch_hits: args.max_batch_hits,
        ..RuntimeConfig::default()
    };
    let handle = spawn_lookup_service(engine, cache, None, config);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());

    for call in &args.calls {
        let hits = handle.lookup(call.as_str()).await?;
        if hits.is_empty() {
            log::warn!("no match for {call}");
        }
        for hit in hits {
            writeln!(out, "{}", serde_json::to_string(&hit)?)?;
        }
    }

    if let Some(path) = &args.batch {
        let reader = BufReader::new(std::fs::File::open(path)?);
        let mut calls = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                calls.push(line.to_string());
            }
        }
        for hit in handle.lookup_batch(calls).await? {
            writeln!(out, "{}", serde_json::to_string(&hit)?)?;
        }
    }

    out.flush()?;
    handle.shutdown().await?;
    Ok(())
}
