use anyhow::Result;
use clap::Parser;
use termite::{build_index, IndexPaths};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the boolean search index from a TSV corpus", long_about = None)]
struct Args {
    /// Corpus file: one `url<TAB>title<TAB>body` record per line
    #[arg(long, default_value = "docs_for_index.csv")]
    input: String,
    /// Output index directory
    #[arg(long, default_value = "./index")]
    output: String,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let start = std::time::Instant::now();
    let paths = IndexPaths::new(&args.output);
    let stats = build_index(&args.input, &paths)?;
    let elapsed = start.elapsed().as_secs_f64().max(1e-9);

    tracing::info!(
        num_docs = stats.num_docs,
        num_pairs = stats.num_pairs,
        num_terms = stats.num_terms,
        docs_per_sec = stats.num_docs as f64 / elapsed,
        kb_per_sec = stats.body_bytes as f64 / 1024.0 / elapsed,
        output = %args.output,
        "index build complete"
    );
    Ok(())
}
