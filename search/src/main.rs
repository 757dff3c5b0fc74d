use anyhow::Result;
use clap::Parser;
use termite::{render_results, IndexPaths, IndexReader, QueryEngine};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Run one boolean query against a built index", long_about = None)]
struct Args {
    /// Boolean query, e.g. `"rust && (parser | lexer) !slow"`
    query: String,
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: String,
    /// Evaluate prefix `!` as the corpus complement instead of the empty set
    #[arg(long, default_value_t = false)]
    complement: bool,
}

fn main() -> Result<()> {
    // diagnostics go to stderr, stdout carries only the JSON object
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let reader = IndexReader::open(&IndexPaths::new(&args.index))?;
    let mut engine = QueryEngine::new(&reader);
    if args.complement {
        engine = engine.with_complement();
    }

    let start = std::time::Instant::now();
    let ids = engine.eval(&args.query)?;
    let time_sec = start.elapsed().as_secs_f64();

    let response = render_results(&reader, &ids, time_sec)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
