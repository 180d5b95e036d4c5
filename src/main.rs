use anyhow::{Context, Result};
use clap::Parser;
use linesql::{
    cli::Args,
    duck::{DuckSink, RelationalSink},
    input,
    process::Ingestor,
    schema::{quote_ident, write_columns},
};
use std::io::{self, BufWriter, Write};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging (stderr; stdout is for results) ────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    // ─── 2) resolve configuration ───────────────────────────────────
    let config = Args::parse()
        .into_config()
        .context("invalid configuration")?;
    let sources = input::resolve_inputs(&config.inputs)?;
    info!(table = %config.table_name, db = %config.db_location, sources = sources.len(), "startup");

    // ─── 3) open storage ────────────────────────────────────────────
    let mut sink = DuckSink::open(&config.db_location)
        .with_context(|| format!("opening database {}", config.db_location))?;

    // ─── 4) ingest every source, in order ───────────────────────────
    let (schema, stats) = {
        let stderr = io::stderr();
        let mut ingestor = Ingestor::new(&config, &mut sink, stderr.lock())?;
        for source in &sources {
            ingestor
                .ingest_source(source)
                .with_context(|| format!("loading {}", source))?;
        }
        ingestor.finish()?
    };
    info!(?stats, "loaded");

    if let Some(path) = &config.schema_out {
        write_columns(path, schema.columns())
            .with_context(|| format!("writing schema to {}", path.display()))?;
        info!(path = %path.display(), "schema written");
    }

    // ─── 5) dump + query, then release storage ──────────────────────
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let delim = config.output_delimiter.as_str();

    if config.dump {
        let names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        writeln!(out, "{}", names.join(delim))?;
        if !schema.is_empty() {
            let all = sink.query(&format!("SELECT * FROM {}", quote_ident(schema.table())))?;
            for line in all.lines(delim) {
                writeln!(out, "{}", line)?;
            }
        }
    }

    let result = sink
        .query(&config.query)
        .with_context(|| format!("running query `{}`", config.query))?;
    for line in result.lines(delim) {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;

    sink.close().context("closing database")?;
    Ok(())
}
